// ==========================================
// 采购单转换引擎 - 预览数据校验结果
// ==========================================
// 用途: 上传预览阶段的数据质量报告
// ==========================================

use crate::domain::order::CanonicalField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueLevel {
    Error,   // 该行无法生成有效采购单行
    Warning, // 可生成,但数据不完整
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 源文件行号（1-based）
    pub row: usize,
    pub level: IssueLevel,
    pub field: CanonicalField,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub error_rows: usize,
    pub warning_rows: usize,
    /// 成功率（%），保留一位小数
    pub success_rate: f64,
    pub issues: Vec<ValidationIssue>,
}
