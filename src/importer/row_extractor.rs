// ==========================================
// 采购单转换引擎 - 数据行提取器
// ==========================================
// 职责: 表头行之后的所有行 → 以表头为键的记录
// 规则: 不可读单元格 → 空字符串；整行为空 → 跳过并计数
// 红线: 单行问题不中止整表
// ==========================================

use crate::domain::{HeaderCandidate, RawSheet, SourceRow, SourceTable};
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use tracing::{debug, info};

/// 单行提取结果
#[derive(Debug, Clone, PartialEq)]
pub enum RowRead {
    Kept(SourceRow),
    Skipped { line: usize, reason: SkipReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BlankRow,
}

/// 提取汇总
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub table: SourceTable,
    pub skipped: usize,
}

pub struct RowExtractor;

impl RowExtractor {
    /// 读取单行
    pub fn read_row(&self, sheet: &RawSheet, header: &HeaderCandidate, row: usize) -> RowRead {
        let mut values = HashMap::with_capacity(header.columns.len());
        for column in &header.columns {
            let cell = sheet.cell(row, column.column);
            if cell.is_unreadable() {
                debug!(row = row + 1, column = column.column + 1, "单元格不可读,按空值处理");
            }
            values.insert(column.name.clone(), cell.text().to_string());
        }

        let source_row = SourceRow {
            line: row + 1,
            values,
        };
        if source_row.is_blank() {
            RowRead::Skipped {
                line: row + 1,
                reason: SkipReason::BlankRow,
            }
        } else {
            RowRead::Kept(source_row)
        }
    }

    /// 提取整个工作表
    pub fn extract(&self, sheet: &RawSheet, header: &HeaderCandidate) -> ImportResult<Extraction> {
        if header.columns.is_empty() {
            return Err(ImportError::RowExtractionAborted {
                sheet: sheet.name.clone(),
                message: "没有可用的列".to_string(),
            });
        }

        let reads: Vec<RowRead> = (header.data_start_row()..sheet.row_count())
            .map(|row| self.read_row(sheet, header, row))
            .collect();

        let mut rows = Vec::new();
        let mut skipped = 0;
        for read in reads {
            match read {
                RowRead::Kept(row) => rows.push(row),
                RowRead::Skipped { .. } => skipped += 1,
            }
        }

        info!(
            sheet = %sheet.name,
            kept = rows.len(),
            skipped,
            "数据行提取完成"
        );

        let headers = header.columns.iter().map(|c| c.name.clone()).collect();
        Ok(Extraction {
            table: SourceTable::new(headers, rows),
            skipped,
        })
    }
}
