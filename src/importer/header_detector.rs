// ==========================================
// 采购单转换引擎 - 表头识别器
// ==========================================
// 职责: 在前 10 行中找出最像表头的一行
// 评分: 关键词组加权 + 每个非空单元格 1 分
// 兜底: 无行超过阈值 → 合成 Column1..ColumnN,不消耗表头行
// ==========================================

use crate::config::DetectionConfig;
use crate::domain::sheet::normalize_headers;
use crate::domain::{HeaderCandidate, HeaderColumn, RawSheet};
use tracing::{debug, info, warn};

pub struct HeaderDetector<'a> {
    config: &'a DetectionConfig,
}

impl<'a> HeaderDetector<'a> {
    pub fn new(config: &'a DetectionConfig) -> Self {
        Self { config }
    }

    /// 单行表头得分（不可读单元格计 0 分）
    pub fn score_row(&self, sheet: &RawSheet, row: usize) -> i64 {
        let columns = self.config.header_scan_columns.min(sheet.column_count());
        (0..columns)
            .map(|column| {
                let cell = sheet.cell(row, column);
                if cell.is_unreadable() {
                    debug!(row, column, "单元格不可读,按空值计分");
                }
                self.score_cell(cell.text())
            })
            .sum()
    }

    fn score_cell(&self, value: &str) -> i64 {
        if value.is_empty() {
            return 0;
        }
        let lowered = value.to_lowercase();
        let keyword_score: i64 = self
            .config
            .header_keywords
            .iter()
            .filter(|rule| rule.matches(&lowered))
            .map(|rule| rule.weight)
            .sum();
        keyword_score + self.config.non_empty_cell_weight
    }

    /// 识别表头
    pub fn detect(&self, sheet: &RawSheet) -> HeaderCandidate {
        let rows = self.config.header_scan_rows.min(sheet.row_count());
        let mut best: Option<(usize, i64)> = None;

        for row in 0..rows {
            let score = self.score_row(sheet, row);
            debug!(row = row + 1, score, "表头候选行评分");

            let beats_best = best.map_or(true, |(_, best_score)| score > best_score);
            if score > self.config.min_header_score && beats_best {
                best = Some((row, score));
            }
        }

        match best {
            Some((row, score)) => {
                let columns = self.header_columns(sheet, row);
                info!(
                    header_row = row + 1,
                    score,
                    header_count = columns.len(),
                    "识别到表头行"
                );
                HeaderCandidate {
                    row_index: Some(row),
                    columns,
                    score,
                }
            }
            None => {
                warn!(columns = sheet.column_count(), "未找到表头,使用合成列名");
                let names = normalize_headers((1..=sheet.column_count()).map(|n| (n, "")));
                HeaderCandidate {
                    row_index: None,
                    columns: names
                        .into_iter()
                        .enumerate()
                        .map(|(column, name)| HeaderColumn { column, name })
                        .collect(),
                    score: 0,
                }
            }
        }
    }

    /// 表头行中的非空单元格（保持列顺序与列位置）
    fn header_columns(&self, sheet: &RawSheet, row: usize) -> Vec<HeaderColumn> {
        let columns = self.config.header_scan_columns.min(sheet.column_count());
        let present: Vec<(usize, &str)> = (0..columns)
            .map(|column| (column, sheet.cell(row, column).text()))
            .filter(|(_, text)| !text.is_empty())
            .collect();

        let names = normalize_headers(present.iter().map(|(column, text)| (column + 1, *text)));
        present
            .into_iter()
            .zip(names)
            .map(|((column, _), name)| HeaderColumn { column, name })
            .collect()
    }
}
