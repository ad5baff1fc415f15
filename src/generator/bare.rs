// ==========================================
// 采购单转换引擎 - 无模板渲染路径
// ==========================================
// 版式: 第 1 行标题横幅（合并 A:I）/ 第 2 行表头 / 第 3 行起数据 / 合计行
// 红线: 本路径失败即整次生成失败
// ==========================================

use crate::config::GeneratorConfig;
use crate::domain::{GeneratedDocument, RenderPath, TransformedRecord};
use crate::generator::canvas::{Canvas, CellStyle};
use crate::generator::error::GeneratorResult;
use crate::generator::layout::{
    fill_records, write_header_row, write_totals_row, FilledRows, RowStyles, COLUMN_COUNT,
    COLUMN_WIDTHS,
};
use chrono::{DateTime, Utc};
use tracing::info;

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 1;
const DATA_START_ROW: u32 = 2;

const STYLES: RowStyles = RowStyles {
    text: CellStyle::Bordered,
    date: CellStyle::BorderedDate,
};

/// 按固定版式构建画布（不序列化）
pub fn layout_bare(
    records: &[TransformedRecord],
    now: DateTime<Utc>,
    config: &GeneratorConfig,
) -> (Canvas, FilledRows) {
    let mut canvas = Canvas::new(config.sheet_title.as_str());

    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        canvas.set_column_width(col, width);
    }

    canvas.merge_row(
        TITLE_ROW,
        0,
        COLUMN_COUNT - 1,
        &config.sheet_title,
        CellStyle::Title,
    );
    write_header_row(&mut canvas, HEADER_ROW, CellStyle::Header);

    let filled = fill_records(&mut canvas, DATA_START_ROW, records, now, STYLES);
    if let Some(row) = write_totals_row(
        &mut canvas,
        DATA_START_ROW,
        records.len(),
        &config.total_label,
        &filled.totals,
        CellStyle::Total,
    ) {
        canvas.fill_blank(row, COLUMN_COUNT, CellStyle::Total);
    }

    (canvas, filled)
}

pub fn render_bare(
    records: &[TransformedRecord],
    now: DateTime<Utc>,
    config: &GeneratorConfig,
) -> GeneratorResult<GeneratedDocument> {
    let (canvas, filled) = layout_bare(records, now, config);
    let content = canvas.serialize()?;

    info!(
        processed = filled.processed,
        failed = filled.errors.len(),
        "无模板渲染完成"
    );
    Ok(filled.into_document(now, content, records.len(), RenderPath::Bare))
}
