// ==========================================
// 采购单转换引擎 - 工作表画布
// ==========================================
// 职责: 在内存中累积单元格/合并区域/列宽,最后一次性序列化为 xlsx
// 红线: 序列化之前不产生任何字节；失败时整张画布丢弃
// ==========================================

use crate::generator::error::GeneratorResult;
use crate::generator::layout::DATE_TIME_FORMAT;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use std::collections::BTreeMap;
use tracing::debug;

/// 单元格值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Excel 日期序列号（1899-12-30 起的天数）
    DateTime(f64),
    Blank,
}

impl CellValue {
    /// 空文本 → Blank
    pub fn text(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Blank
        } else {
            CellValue::Text(value.to_string())
        }
    }

    pub fn number_or_blank(value: Option<f64>) -> Self {
        value.map_or(CellValue::Blank, CellValue::Number)
    }
}

/// 单元格样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Plain,
    Date,
    Bold,
    Title,
    Header,
    Bordered,
    BorderedDate,
    Total,
}

impl CellStyle {
    fn format(self) -> Format {
        let bordered = || Format::new().set_border(FormatBorder::Thin);
        match self {
            CellStyle::Plain => Format::new(),
            CellStyle::Date => Format::new().set_num_format(DATE_TIME_FORMAT),
            CellStyle::Bold => Format::new().set_bold(),
            CellStyle::Title => Format::new()
                .set_bold()
                .set_font_size(16)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            CellStyle::Header => bordered()
                .set_bold()
                .set_background_color(Color::RGB(0xE0E0E0)),
            CellStyle::Bordered => bordered(),
            CellStyle::BorderedDate => bordered().set_num_format(DATE_TIME_FORMAT),
            CellStyle::Total => bordered()
                .set_bold()
                .set_background_color(Color::RGB(0xF0F0F0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasCell {
    pub value: CellValue,
    pub style: CellStyle,
}

#[derive(Debug, Clone)]
struct MergedRange {
    first_row: u32,
    first_col: u16,
    last_row: u32,
    last_col: u16,
    text: String,
    style: CellStyle,
}

/// 单工作表画布（0-based 坐标）
#[derive(Debug, Clone)]
pub struct Canvas {
    sheet_name: String,
    cells: BTreeMap<(u32, u16), CanvasCell>,
    merges: Vec<MergedRange>,
    widths: Vec<(u16, f64)>,
}

impl Canvas {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            widths: Vec::new(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// 写入（覆盖）单元格
    pub fn put(&mut self, row: u32, col: u16, value: CellValue, style: CellStyle) {
        self.cells.insert((row, col), CanvasCell { value, style });
    }

    /// 只在空位写入带样式的空白单元格
    pub fn fill_blank(&mut self, row: u32, columns: u16, style: CellStyle) {
        for col in 0..columns {
            self.cells.entry((row, col)).or_insert(CanvasCell {
                value: CellValue::Blank,
                style,
            });
        }
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&CanvasCell> {
        self.cells.get(&(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = ((u32, u16), &CanvasCell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    /// 同一行内合并（例如标题横幅）
    pub fn merge_row(
        &mut self,
        row: u32,
        first_col: u16,
        last_col: u16,
        text: &str,
        style: CellStyle,
    ) {
        self.cells
            .retain(|(r, c), _| !(*r == row && (first_col..=last_col).contains(c)));
        self.merges.push(MergedRange {
            first_row: row,
            first_col,
            last_row: row,
            last_col,
            text: text.to_string(),
            style,
        });
    }

    /// 任意矩形合并,左上角的值仍由单元格表提供
    pub fn merge_region(&mut self, first_row: u32, first_col: u16, last_row: u32, last_col: u16) {
        self.merges.push(MergedRange {
            first_row,
            first_col,
            last_row,
            last_col,
            text: String::new(),
            style: CellStyle::Plain,
        });
    }

    pub fn merge_count(&self) -> usize {
        self.merges.len()
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.widths.push((col, width));
    }

    /// 序列化为 xlsx 字节
    pub fn serialize(&self) -> GeneratorResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, width) in &self.widths {
            worksheet.set_column_width(*col, *width)?;
        }

        for merge in &self.merges {
            worksheet.merge_range(
                merge.first_row,
                merge.first_col,
                merge.last_row,
                merge.last_col,
                &merge.text,
                &merge.style.format(),
            )?;
        }

        for ((row, col), cell) in &self.cells {
            let format = cell.style.format();
            match &cell.value {
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(*row, *col, text, &format)?;
                }
                CellValue::Number(number) | CellValue::DateTime(number) => {
                    worksheet.write_number_with_format(*row, *col, *number, &format)?;
                }
                CellValue::Blank => {
                    worksheet.write_blank(*row, *col, &format)?;
                }
            }
        }

        let bytes = workbook.save_to_buffer()?;
        debug!(
            sheet = %self.sheet_name,
            cells = self.cells.len(),
            bytes = bytes.len(),
            "画布序列化完成"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::error::GeneratorError;

    #[test]
    fn test_text_helper_maps_empty_to_blank() {
        assert_eq!(CellValue::text(""), CellValue::Blank);
        assert_eq!(CellValue::text("a"), CellValue::Text("a".to_string()));
        assert_eq!(CellValue::number_or_blank(None), CellValue::Blank);
    }

    #[test]
    fn test_fill_blank_keeps_existing_cells() {
        let mut canvas = Canvas::new("발주서");
        canvas.put(0, 1, CellValue::Number(3.0), CellStyle::Total);
        canvas.fill_blank(0, 3, CellStyle::Total);

        assert_eq!(canvas.cell(0, 1).unwrap().value, CellValue::Number(3.0));
        assert_eq!(canvas.cell(0, 2).unwrap().value, CellValue::Blank);
        assert_eq!(canvas.cells().count(), 3);
    }

    #[test]
    fn test_merge_row_clears_covered_cells() {
        let mut canvas = Canvas::new("발주서");
        canvas.put(0, 0, CellValue::text("x"), CellStyle::Plain);
        canvas.put(0, 4, CellValue::text("y"), CellStyle::Plain);
        canvas.merge_row(0, 0, 8, "발주서", CellStyle::Title);
        assert!(canvas.cell(0, 4).is_none());
    }

    #[test]
    fn test_serialize_produces_zip_bytes() {
        let mut canvas = Canvas::new("발주서");
        canvas.put(0, 0, CellValue::text("품목명"), CellStyle::Header);
        canvas.put(1, 0, CellValue::Number(10.0), CellStyle::Bordered);
        let bytes = canvas.serialize().unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_serialize_rejects_oversized_text() {
        let mut canvas = Canvas::new("s");
        canvas.put(0, 0, CellValue::text(&"가".repeat(40_000)), CellStyle::Plain);
        assert!(matches!(canvas.serialize(), Err(GeneratorError::Xlsx(_))));
    }
}
