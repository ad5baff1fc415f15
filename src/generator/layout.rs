// ==========================================
// 采购单转换引擎 - 采购单版式
// ==========================================
// 职责: 输出列定义 / 发注编号 / 文件名 / 逐行写入 / 合计行
// 两条渲染路径共用本模块,保证记录与合计口径一致
// 红线: 单行失败只记录诊断,不中断后续行
// ==========================================

use crate::domain::{
    CanonicalField, GeneratedDocument, RenderPath, RowDiagnostic, TransformedRecord,
};
use crate::generator::canvas::{Canvas, CellStyle, CellValue};
use crate::generator::error::{GeneratorError, GeneratorResult};
use crate::importer::DataCleaner;
use chrono::{DateTime, Utc};
use tracing::warn;

/// 输出列（顺序即列顺序）
pub const OUTPUT_HEADERS: [&str; 9] = [
    "발주번호",
    "발주일자",
    "품목명",
    "주문수량",
    "단가",
    "공급가액",
    "받는 분",
    "전화번호",
    "주소",
];

pub const COLUMN_COUNT: u16 = OUTPUT_HEADERS.len() as u16;

/// 无模板路径的列宽
pub const COLUMN_WIDTHS: [f64; 9] = [15.0, 12.0, 20.0, 10.0, 12.0, 12.0, 15.0, 15.0, 25.0];

/// xlsx 单元格文本上限（字符数）
pub const MAX_CELL_TEXT_LEN: usize = 32_767;
/// xlsx 工作表行数上限
pub const MAX_SHEET_ROWS: u64 = 1_048_576;

pub const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

// 1970-01-01 对应的 Excel 序列号
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

// 列位置
const COL_ITEM: u16 = 2;
const COL_QUANTITY: u16 = 3;
const COL_AMOUNT: u16 = 5;

/// 发注编号: ORD{yyyyMMdd}-{序号:03}
pub fn order_number(now: DateTime<Utc>, index: usize) -> String {
    format!("ORD{}-{:03}", now.format("%Y%m%d"), index + 1)
}

/// 输出文件名: purchase_order_{UTC 时间戳}.xlsx
pub fn output_file_name(now: DateTime<Utc>) -> String {
    format!("purchase_order_{}.xlsx", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// UTC 时间 → Excel 日期序列号（精确到秒）
pub fn excel_serial(now: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_SERIAL + now.timestamp() as f64 / SECONDS_PER_DAY
}

/// 一行采购单的单元格样式
#[derive(Debug, Clone, Copy)]
pub struct RowStyles {
    pub text: CellStyle,
    pub date: CellStyle,
}

// ==========================================
// OrderLine - 单条记录的输出行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub cells: Vec<CellValue>,
    pub quantity: Option<i64>,
    pub amount: Option<f64>,
}

impl OrderLine {
    /// 由记录准备输出行（不写入画布）
    ///
    /// 文本超出单元格上限时整行失败
    pub fn prepare(
        index: usize,
        record: &TransformedRecord,
        now: DateTime<Utc>,
    ) -> GeneratorResult<Self> {
        let cleaner = DataCleaner;
        let text = |column: &'static str, field: CanonicalField| -> GeneratorResult<CellValue> {
            let value = record.get_or_empty(field);
            let length = value.chars().count();
            if length > MAX_CELL_TEXT_LEN {
                return Err(GeneratorError::CellLimitExceeded {
                    column,
                    length,
                    limit: MAX_CELL_TEXT_LEN,
                });
            }
            Ok(CellValue::text(value))
        };

        let quantity = cleaner.parse_quantity(record.get_or_empty(CanonicalField::Quantity));
        let unit_price = cleaner.parse_decimal(record.get_or_empty(CanonicalField::UnitPrice));
        let amount = cleaner.parse_decimal(record.get_or_empty(CanonicalField::Amount));

        let cells = vec![
            CellValue::Text(order_number(now, index)),
            CellValue::DateTime(excel_serial(now)),
            text(OUTPUT_HEADERS[2], CanonicalField::ProductName)?,
            CellValue::number_or_blank(quantity.map(|q| q as f64)),
            CellValue::number_or_blank(unit_price),
            CellValue::number_or_blank(amount),
            text(OUTPUT_HEADERS[6], CanonicalField::CustomerName)?,
            text(OUTPUT_HEADERS[7], CanonicalField::Contact)?,
            text(OUTPUT_HEADERS[8], CanonicalField::Address)?,
        ];

        Ok(Self {
            cells,
            quantity,
            amount,
        })
    }

    pub fn write(&self, canvas: &mut Canvas, row: u32, styles: RowStyles) {
        for (col, value) in (0u16..).zip(&self.cells) {
            let style = match value {
                CellValue::DateTime(_) => styles.date,
                _ => styles.text,
            };
            canvas.put(row, col, value.clone(), style);
        }
    }
}

/// 合计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub lines: usize,
    pub quantity: i64,
    pub amount: f64,
}

impl Totals {
    fn add(&mut self, line: &OrderLine) {
        self.lines += 1;
        self.quantity = self.quantity.saturating_add(line.quantity.unwrap_or(0));
        self.amount += line.amount.unwrap_or(0.0);
    }
}

/// 逐行写入结果
#[derive(Debug, Clone, Default)]
pub struct FilledRows {
    pub processed: usize,
    pub errors: Vec<RowDiagnostic>,
    pub totals: Totals,
}

impl FilledRows {
    /// 组装生成结果
    pub fn into_document(
        self,
        now: DateTime<Utc>,
        content: Vec<u8>,
        total_rows: usize,
        rendering: RenderPath,
    ) -> GeneratedDocument {
        GeneratedDocument {
            file_name: output_file_name(now),
            content,
            processed_rows: self.processed,
            total_rows,
            errors: self.errors,
            rendering,
        }
    }
}

/// 0-based 行号 → xlsx 行号（超出上限则失败）
fn checked_row(row: u64) -> GeneratorResult<u32> {
    if row >= MAX_SHEET_ROWS {
        return Err(GeneratorError::SheetLimitExceeded {
            row: row + 1,
            limit: MAX_SHEET_ROWS,
        });
    }
    u32::try_from(row).map_err(|_| GeneratorError::SheetLimitExceeded {
        row: row + 1,
        limit: MAX_SHEET_ROWS,
    })
}

/// 写入表头行
pub fn write_header_row(canvas: &mut Canvas, row: u32, style: CellStyle) {
    for (col, header) in (0u16..).zip(OUTPUT_HEADERS) {
        canvas.put(row, col, CellValue::text(header), style);
    }
}

/// 从 data_start（0-based）开始逐条写入记录
pub fn fill_records(
    canvas: &mut Canvas,
    data_start: u32,
    records: &[TransformedRecord],
    now: DateTime<Utc>,
    styles: RowStyles,
) -> FilledRows {
    let mut filled = FilledRows::default();

    for (index, record) in records.iter().enumerate() {
        let outcome = checked_row(u64::from(data_start) + index as u64)
            .and_then(|row| OrderLine::prepare(index, record, now).map(|line| (row, line)));

        match outcome {
            Ok((row, line)) => {
                line.write(canvas, row, styles);
                filled.totals.add(&line);
                filled.processed += 1;
            }
            Err(e) => {
                warn!(row = index + 1, error = %e, "记录写入失败,已跳过");
                filled.errors.push(RowDiagnostic {
                    row: index + 1,
                    error: e.to_string(),
                });
            }
        }
    }

    filled
}

/// 写入合计行（至少一条记录成功时）
///
/// # 返回
/// - Some(row): 合计行位置（0-based）
/// - None: 无成功记录或行号越界
pub fn write_totals_row(
    canvas: &mut Canvas,
    data_start: u32,
    record_count: usize,
    label: &str,
    totals: &Totals,
    style: CellStyle,
) -> Option<u32> {
    if totals.lines == 0 {
        return None;
    }

    let row = match checked_row(u64::from(data_start) + record_count as u64) {
        Ok(row) => row,
        Err(e) => {
            warn!(error = %e, "合计行越界,未写入");
            return None;
        }
    };

    canvas.put(row, COL_ITEM, CellValue::text(label), style);
    canvas.put(
        row,
        COL_QUANTITY,
        CellValue::Number(totals.quantity as f64),
        style,
    );
    canvas.put(row, COL_AMOUNT, CellValue::Number(totals.amount), style);
    Some(row)
}
