// ==========================================
// 采购单转换引擎 - 模板渲染路径
// ==========================================
// 职责: 模板内容 + 表头行 + 记录行 + 合计行 → xlsx
// 红线: 本路径任何失败都只返回 FallbackRequired,不向外抛错
// ==========================================

use crate::config::GeneratorConfig;
use crate::domain::{RenderPath, TransformedRecord};
use crate::generator::canvas::{Canvas, CellStyle};
use crate::generator::layout::{fill_records, write_header_row, write_totals_row, RowStyles};
use crate::generator::pipeline::StageOutcome;
use crate::generator::template::TemplateSheet;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

const STYLES: RowStyles = RowStyles {
    text: CellStyle::Plain,
    date: CellStyle::Date,
};

pub fn render_templated(
    template: &TemplateSheet,
    records: &[TransformedRecord],
    now: DateTime<Utc>,
    config: &GeneratorConfig,
) -> StageOutcome {
    let mut canvas = Canvas::new(template.name.as_str());

    let normalized = match template.normalize_onto(&mut canvas) {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, "模板公式规范化失败");
            return StageOutcome::FallbackRequired(e.to_string());
        }
    };

    // 表头写在数据起始行上一行
    let data_start = template.data_start_row(config).max(1);
    write_header_row(&mut canvas, data_start - 1, CellStyle::Bold);

    let filled = fill_records(&mut canvas, data_start, records, now, STYLES);
    write_totals_row(
        &mut canvas,
        data_start,
        records.len(),
        &config.total_label,
        &filled.totals,
        CellStyle::Bold,
    );

    match canvas.serialize() {
        Ok(content) => {
            info!(
                sheet = %template.name,
                data_start_row = data_start + 1,
                normalized_formulas = normalized,
                processed = filled.processed,
                "模板渲染完成"
            );
            StageOutcome::Success(filled.into_document(
                now,
                content,
                records.len(),
                RenderPath::Templated,
            ))
        }
        Err(e) => {
            warn!(error = %e, "模板路径序列化失败");
            StageOutcome::FallbackRequired(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalField;
    use crate::generator::canvas::CellValue;
    use crate::generator::template::TemplateCell;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_templated_success() {
        let template = TemplateSheet::from_cells(
            "양식",
            vec![
                ((0, 0), TemplateCell::Static(CellValue::Text("발주서".to_string()))),
                ((3, 0), TemplateCell::Static(CellValue::Text("NO".to_string()))),
            ],
        );
        let record: TransformedRecord = vec![(CanonicalField::ProductName, "사과".to_string())]
            .into_iter()
            .collect();

        match render_templated(&template, &[record], now(), &GeneratorConfig::default()) {
            StageOutcome::Success(doc) => {
                assert_eq!(doc.rendering, RenderPath::Templated);
                assert_eq!(doc.processed_rows, 1);
                assert_eq!(doc.file_name, "purchase_order_2026-10-19T09-00-00.xlsx");
                assert!(!doc.content.is_empty());
            }
            StageOutcome::FallbackRequired(reason) => panic!("unexpected fallback: {}", reason),
        }
    }

    #[test]
    fn test_oversized_template_cell_requires_fallback() {
        let template = TemplateSheet::from_cells(
            "양식",
            vec![(
                (0, 0),
                TemplateCell::Static(CellValue::Text("x".repeat(40_000))),
            )],
        );
        assert!(matches!(
            render_templated(&template, &[], now(), &GeneratorConfig::default()),
            StageOutcome::FallbackRequired(_)
        ));
    }
}
