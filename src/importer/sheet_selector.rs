// ==========================================
// 采购单转换引擎 - 工作表选择器
// ==========================================
// 职责: 对工作簿内所有工作表评分,选出最可能的数据表
// 评分: 名称关键词 + min(行数/10, 20) + min(列数, 10)
// 兜底: 没有可评分的工作表时使用第一个工作表
// ==========================================

use crate::config::DetectionConfig;
use crate::domain::{RawSheet, SheetCandidate};
use crate::importer::error::{ImportError, ImportResult};
use tracing::{debug, info, warn};

/// 工作簿中的一个工作表（可能解码失败）
#[derive(Debug)]
pub struct SheetSlot {
    pub name: String,
    pub sheet: Result<RawSheet, String>,
}

pub struct SheetSelector<'a> {
    config: &'a DetectionConfig,
}

impl<'a> SheetSelector<'a> {
    pub fn new(config: &'a DetectionConfig) -> Self {
        Self { config }
    }

    /// 计算单个工作表得分
    ///
    /// # 返回
    /// - None: 行数不足或无列,不参与评选
    pub fn score(&self, sheet: &RawSheet) -> Option<f64> {
        if sheet.row_count() < self.config.sheet_min_rows || sheet.column_count() == 0 {
            return None;
        }

        let lowered = sheet.name.to_lowercase();
        let mut score = 0.0;

        if self
            .config
            .sheet_positive_tokens
            .iter()
            .any(|t| lowered.contains(&t.to_lowercase()))
        {
            score += self.config.sheet_positive_bonus;
        }
        if self
            .config
            .sheet_negative_tokens
            .iter()
            .any(|t| lowered.contains(&t.to_lowercase()))
        {
            score -= self.config.sheet_negative_penalty;
        }

        score += (sheet.row_count() as f64 / self.config.sheet_row_divisor)
            .min(self.config.sheet_row_score_cap);
        score += (sheet.column_count() as f64).min(self.config.sheet_column_score_cap);

        Some(score)
    }

    /// 对全部工作表评分（解码失败/被排除的工作表不出现）
    pub fn rank(&self, slots: &[SheetSlot]) -> Vec<SheetCandidate> {
        let mut candidates = Vec::new();
        for (index, slot) in slots.iter().enumerate() {
            match &slot.sheet {
                Ok(sheet) => match self.score(sheet) {
                    Some(score) => {
                        debug!(
                            sheet = %slot.name,
                            rows = sheet.row_count(),
                            columns = sheet.column_count(),
                            score,
                            "工作表评分"
                        );
                        candidates.push(SheetCandidate {
                            index,
                            name: slot.name.clone(),
                            score,
                        });
                    }
                    None => debug!(sheet = %slot.name, "工作表数据不足,排除"),
                },
                Err(reason) => warn!(sheet = %slot.name, reason = %reason, "工作表解码失败,跳过"),
            }
        }
        candidates
    }

    /// 选出最佳工作表
    ///
    /// 同分时取排在前面的工作表
    pub fn select(&self, mut slots: Vec<SheetSlot>) -> ImportResult<RawSheet> {
        if slots.is_empty() {
            return Err(ImportError::NoUsableSheet);
        }

        let best = self
            .rank(&slots)
            .into_iter()
            .fold(None::<SheetCandidate>, |best, candidate| match best {
                Some(current) if current.score >= candidate.score => Some(current),
                _ => Some(candidate),
            });

        let index = match best {
            Some(candidate) => {
                info!(sheet = %candidate.name, score = candidate.score, "选中工作表");
                candidate.index
            }
            None => {
                warn!(sheet = %slots[0].name, "没有可评分的工作表,使用第一个工作表");
                0
            }
        };

        let slot = slots.swap_remove(index);
        slot.sheet.map_err(|reason| {
            ImportError::UnreadableSource(format!("工作表 {} 无法读取: {}", slot.name, reason))
        })
    }
}
