// ==========================================
// 采购单转换引擎 - 模板读取
// ==========================================
// 职责: 读取模板第一个工作表的单元格值与公式
// 职责: 定位数据起始行（NO/번호/순번 标记的下一行）
// 职责: 公式单元格规范化为静态值（使用缓存结果）
// 保留: 合并区域（仅 xlsx 模板可读）；列宽与单元格格式 calamine 不提供
// ==========================================

use crate::config::GeneratorConfig;
use crate::generator::canvas::{Canvas, CellStyle, CellValue};
use crate::generator::error::{GeneratorError, GeneratorResult};
use crate::importer::DataCleaner;
use calamine::{open_workbook_auto_from_rs, Data, Dimensions, Range, Reader, Sheets};
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::{debug, info, warn};

/// 公式单元格的缓存结果
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Number(f64),
    Text(String),
    Empty,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateCell {
    Static(CellValue),
    Formula { formula: String, cached: CachedValue },
}

/// 合并区域（0-based,含首尾）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRegion {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl MergeRegion {
    fn from_dimensions(dimensions: &Dimensions) -> Option<Self> {
        let region = Self {
            first_row: dimensions.start.0,
            first_col: u16::try_from(dimensions.start.1).ok()?,
            last_row: dimensions.end.0,
            last_col: u16::try_from(dimensions.end.1).ok()?,
        };
        // 单个单元格不构成合并
        let single = region.first_row == region.last_row && region.first_col == region.last_col;
        (!single).then_some(region)
    }
}

/// 模板工作表（0-based 坐标）
#[derive(Debug, Clone)]
pub struct TemplateSheet {
    pub name: String,
    cells: BTreeMap<(u32, u16), TemplateCell>,
    merges: Vec<MergeRegion>,
}

impl TemplateSheet {
    pub fn from_cells(
        name: impl Into<String>,
        cells: impl IntoIterator<Item = ((u32, u16), TemplateCell)>,
    ) -> Self {
        Self {
            name: name.into(),
            cells: cells.into_iter().collect(),
            merges: Vec::new(),
        }
    }

    pub fn with_merges(mut self, merges: impl IntoIterator<Item = MergeRegion>) -> Self {
        self.merges = merges.into_iter().collect();
        self
    }

    /// 从模板字节读取第一个工作表
    pub fn load(bytes: &[u8]) -> GeneratorResult<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| GeneratorError::TemplateUnreadable(e.to_string()))?;

        let name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| GeneratorError::TemplateUnreadable("模板没有工作表".to_string()))?;

        let values = workbook
            .worksheet_range(&name)
            .map_err(|e| GeneratorError::TemplateUnreadable(e.to_string()))?;
        // 部分格式不提供公式,按无公式处理
        let formulas = workbook.worksheet_formula(&name).ok();

        let mut cells = BTreeMap::new();
        for (pos, data) in absolute_cells(&values) {
            if let Some(value) = static_value(data) {
                cells.insert(pos, TemplateCell::Static(value));
            }
        }
        let formula_cells = formulas.as_ref().map(absolute_cells).unwrap_or_default();
        for (pos, formula) in formula_cells {
            if formula.trim().is_empty() {
                continue;
            }
            let cached = values
                .get_value((pos.0, u32::from(pos.1)))
                .map(cached_value)
                .unwrap_or(CachedValue::Empty);
            cells.insert(
                pos,
                TemplateCell::Formula {
                    formula: formula.clone(),
                    cached,
                },
            );
        }

        let merges = read_merges(&mut workbook, &name);

        info!(
            sheet = %name,
            cells = cells.len(),
            merges = merges.len(),
            "模板读取完成"
        );
        Ok(Self {
            name,
            cells,
            merges,
        })
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&TemplateCell> {
        self.cells.get(&(row, col))
    }

    pub fn merges(&self) -> &[MergeRegion] {
        &self.merges
    }

    pub fn formula_count(&self) -> usize {
        self.cells
            .values()
            .filter(|c| matches!(c, TemplateCell::Formula { .. }))
            .count()
    }

    /// 数据起始行（0-based）
    ///
    /// 在前 N×M 个单元格中查找标记文字,找不到时使用默认行
    pub fn data_start_row(&self, config: &GeneratorConfig) -> u32 {
        let markers: Vec<String> = config
            .data_start_markers
            .iter()
            .map(|m| m.trim().to_uppercase())
            .collect();

        for row in 0..config.marker_scan_rows as u32 {
            for col in 0..config.marker_scan_columns as u16 {
                let text = match self.cell(row, col) {
                    Some(TemplateCell::Static(CellValue::Text(text))) => {
                        text.trim().to_uppercase()
                    }
                    _ => continue,
                };
                if markers.contains(&text) {
                    debug!(row = row + 1, col = col + 1, marker = %text, "找到数据区标记");
                    return row + 1;
                }
            }
        }

        config.default_data_start_row.saturating_sub(1) as u32
    }

    /// 复制到画布,公式单元格转为静态值
    ///
    /// 缓存结果为错误值时规范化失败
    pub fn normalize_onto(&self, canvas: &mut Canvas) -> GeneratorResult<usize> {
        let cleaner = DataCleaner;
        let mut normalized = 0;

        for (&(row, col), cell) in &self.cells {
            let (value, style) = match cell {
                TemplateCell::Static(value @ CellValue::DateTime(_)) => {
                    (value.clone(), CellStyle::Date)
                }
                TemplateCell::Static(value) => (value.clone(), CellStyle::Plain),
                TemplateCell::Formula { formula, cached } => {
                    normalized += 1;
                    let value = match cached {
                        CachedValue::Number(n) => CellValue::Number(*n),
                        CachedValue::Text(text) => match cleaner.parse_decimal(text) {
                            Some(n) => CellValue::Number(n),
                            None => CellValue::text(text),
                        },
                        CachedValue::Empty => CellValue::Number(0.0),
                        CachedValue::Error(reason) => {
                            return Err(GeneratorError::TemplateUnreadable(format!(
                                "公式 {} 的结果无效: {}",
                                formula, reason
                            )))
                        }
                    };
                    (value, CellStyle::Plain)
                }
            };
            canvas.put(row, col, value, style);
        }

        for merge in &self.merges {
            canvas.merge_region(merge.first_row, merge.first_col, merge.last_row, merge.last_col);
        }

        Ok(normalized)
    }
}

/// 读取合并区域（失败时按无合并处理）
fn read_merges(workbook: &mut Sheets<Cursor<Vec<u8>>>, name: &str) -> Vec<MergeRegion> {
    let Sheets::Xlsx(xlsx) = workbook else {
        return Vec::new();
    };
    if let Err(e) = xlsx.load_merged_regions() {
        warn!(error = %e, "模板合并区域读取失败,忽略");
        return Vec::new();
    }
    xlsx.merged_regions_by_sheet(name)
        .into_iter()
        .filter_map(|(_, _, dimensions)| MergeRegion::from_dimensions(dimensions))
        .collect()
}

/// 非空单元格及其绝对坐标
fn absolute_cells<T>(range: &Range<T>) -> Vec<((u32, u16), &T)>
where
    T: calamine::CellType,
{
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    range
        .used_cells()
        .filter_map(|(r, c, value)| {
            let row = start_row.checked_add(u32::try_from(r).ok()?)?;
            let col = u16::try_from(u64::from(start_col) + c as u64).ok()?;
            Some(((row, col), value))
        })
        .collect()
}

fn static_value(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::DateTime(dt) => Some(CellValue::DateTime(dt.as_f64())),
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        other => Some(CellValue::text(&other.to_string())),
    }
}

fn cached_value(data: &Data) -> CachedValue {
    match data {
        Data::Empty => CachedValue::Empty,
        Data::Int(i) => CachedValue::Number(*i as f64),
        Data::Float(f) => CachedValue::Number(*f),
        Data::DateTime(dt) => CachedValue::Number(dt.as_f64()),
        Data::Error(e) => CachedValue::Error(format!("{:?}", e)),
        other => CachedValue::Text(other.to_string()),
    }
}
