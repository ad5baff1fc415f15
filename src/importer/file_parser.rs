// ==========================================
// 采购单转换引擎 - 文件解析器实现
// ==========================================
// 阶段 0: 文件字节 → SourceTable
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// CSV: 按行切分 + 逗号切分,不支持引号转义
// ==========================================

use crate::config::DetectionConfig;
use crate::domain::sheet::normalize_headers;
use crate::domain::{RawCell, RawSheet, SourceRow, SourceTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_detector::HeaderDetector;
use crate::importer::importer_trait::FileParser;
use crate::importer::row_extractor::RowExtractor;
use crate::importer::sheet_selector::{SheetSelector, SheetSlot};
use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader};
use chrono::NaiveTime;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::{debug, info, warn};

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<SourceTable> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ImportError::UnreadableSource(format!("CSV 不是有效的 UTF-8: {}", e)))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        // 关闭引号处理: 逗号一律视为分隔符
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .quoting(false)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        // 读取所有非空行
        let mut lines: Vec<(usize, Vec<String>)> = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(lines.len() + 1);
            let cells: Vec<String> = record.iter().map(|v| v.to_string()).collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }
            lines.push((line, cells));
        }

        let mut lines = lines.into_iter();
        let (_, header_cells) = lines.next().ok_or(ImportError::EmptySource)?;
        let headers = normalize_headers(
            header_cells
                .iter()
                .enumerate()
                .map(|(idx, name)| (idx + 1, name.as_str())),
        );

        let rows: Vec<SourceRow> = lines
            .map(|(line, cells)| {
                let values: HashMap<String, String> = headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| {
                        (header.clone(), cells.get(idx).cloned().unwrap_or_default())
                    })
                    .collect();
                SourceRow { line, values }
            })
            .filter(|row| !row.is_blank())
            .collect();

        info!(headers = headers.len(), rows = rows.len(), "CSV 解析完成");
        Ok(SourceTable::new(headers, rows))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 流程: 解码全部工作表 → 选表 → 识别表头 → 提取数据行
pub struct ExcelParser {
    config: DetectionConfig,
}

impl ExcelParser {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// 解码工作簿（单个工作表失败不影响其他工作表）
    pub fn decode_workbook(&self, bytes: &[u8]) -> ImportResult<Vec<SheetSlot>> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor)?;

        let names: Vec<String> = workbook.sheet_names().to_vec();
        debug!(sheet_count = names.len(), "工作簿解码完成");

        let mut slots = Vec::with_capacity(names.len());
        for name in names {
            let sheet = workbook
                .worksheet_range(&name)
                .map(|range| range_to_raw_sheet(&name, &range))
                .map_err(|e| e.to_string());
            slots.push(SheetSlot { name, sheet });
        }
        Ok(slots)
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<SourceTable> {
        let slots = self.decode_workbook(bytes)?;
        let sheet = SheetSelector::new(&self.config).select(slots)?;

        if sheet.row_count() == 0 {
            warn!(sheet = %sheet.name, "选中的工作表为空");
            return Err(ImportError::EmptySource);
        }

        let header = HeaderDetector::new(&self.config).detect(&sheet);
        let extraction = RowExtractor.extract(&sheet, &header)?;
        Ok(extraction.table)
    }
}

/// calamine Range → RawSheet（按绝对坐标,从 A1 开始）
fn range_to_raw_sheet(name: &str, range: &Range<Data>) -> RawSheet {
    let Some((end_row, end_col)) = range.end() else {
        return RawSheet::new(name, Vec::new());
    };

    let rows = (0..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| to_raw_cell(range.get_value((row, col))))
                .collect()
        })
        .collect();
    RawSheet::new(name, rows)
}

fn to_raw_cell(data: Option<&Data>) -> RawCell {
    let text = match data {
        None | Some(Data::Empty) => return RawCell::Empty,
        Some(Data::Error(e)) => return RawCell::Unreadable(format!("{:?}", e)),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::DateTime(dt)) => format_excel_datetime(dt),
        Some(other) => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        RawCell::Empty
    } else {
        RawCell::Text(text)
    }
}

/// 日期单元格 → "YYYY-MM-DD"（零点）或 "YYYY-MM-DD HH:MM:SS"；时长保留序列值
fn format_excel_datetime(dt: &ExcelDateTime) -> String {
    match dt.as_datetime() {
        Some(value) if dt.is_datetime() => {
            if value.time() == NaiveTime::MIN {
                value.format("%Y-%m-%d").to_string()
            } else {
                value.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }
        _ => dt.to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    config: DetectionConfig,
}

impl UniversalFileParser {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// 按声明的扩展名解析（可带或不带前导点）
    pub fn parse(&self, bytes: &[u8], extension: &str) -> ImportResult<SourceTable> {
        let ext = extension.trim().trim_start_matches('.').to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_bytes(bytes),
            "xlsx" | "xls" | "xlsm" => ExcelParser::new(self.config.clone()).parse_bytes(bytes),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}
