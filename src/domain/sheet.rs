// ==========================================
// 采购单转换引擎 - 源表模型
// ==========================================
// 职责: 原始工作表网格、候选评分结果、解析后的源表
// 生命周期: 仅存在于单次转换调用内
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ==========================================
// RawCell / RawSheet - 原始单元格网格
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    /// 无法读取的单元格（错误值等），按空值处理
    Unreadable(String),
}

impl RawCell {
    /// 单元格文本（已 TRIM；空/不可读 → ""）
    pub fn text(&self) -> &str {
        match self {
            RawCell::Text(value) => value.as_str(),
            RawCell::Empty | RawCell::Unreadable(_) => "",
        }
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, RawCell::Unreadable(_))
    }
}

#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    rows: Vec<Vec<RawCell>>,
    column_count: usize,
}

impl RawSheet {
    /// 行优先网格；列数取最长行
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            name: name.into(),
            rows,
            column_count,
        }
    }

    /// 便于测试构造: 纯文本网格
    pub fn from_text_rows(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| {
                        let trimmed = value.trim();
                        if trimmed.is_empty() {
                            RawCell::Empty
                        } else {
                            RawCell::Text(trimmed.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(name, rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// 0-based 坐标；越界视为空单元格
    pub fn cell(&self, row: usize, column: usize) -> &RawCell {
        const EMPTY: &RawCell = &RawCell::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(EMPTY)
    }
}

// ==========================================
// 候选评分结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCandidate {
    pub index: usize,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    pub column: usize, // 0-based 列号
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCandidate {
    /// 表头所在行（0-based）；None 表示合成表头、未消耗表头行
    pub row_index: Option<usize>,
    pub columns: Vec<HeaderColumn>,
    pub score: i64,
}

impl HeaderCandidate {
    /// 数据起始行（0-based）
    pub fn data_start_row(&self) -> usize {
        self.row_index.map(|row| row + 1).unwrap_or(0)
    }
}

// ==========================================
// SourceTable - 解析后的源表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    /// 源文件中的行号（1-based）
    pub line: usize,
    pub values: HashMap<String, String>,
}

impl SourceRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<SourceRow>,
}

impl SourceTable {
    pub fn new(headers: Vec<String>, rows: Vec<SourceRow>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// 表头规范化: 空表头 → Column{n}，重名 → name_2, name_3 ...
///
/// 输入顺序即列顺序，n 为 1-based 位置
pub fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = (usize, S)>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();

    for (position, name) in raw {
        let trimmed = name.as_ref().trim();
        let base = if trimmed.is_empty() {
            format!("Column{}", position)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while seen.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}
