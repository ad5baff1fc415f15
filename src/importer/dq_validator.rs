// ==========================================
// 采购单转换引擎 - 预览数据质量校验器
// ==========================================
// 职责: 按内置别名映射逐行检查,生成预览质量报告
// Error: 缺少商品名（无法生成采购单行）
// Warning: 数量缺失/非数字、单价非数字、缺少联系方式或地址
// 红线: 只报告,不修改数据
// ==========================================

use crate::domain::{
    CanonicalField, IssueLevel, SourceRow, SourceTable, ValidationIssue, ValidationReport,
};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::FieldMapper;
use tracing::info;

pub struct OrderValidator;

impl OrderValidator {
    /// 校验单行
    pub fn validate_row(&self, row: &SourceRow) -> Vec<ValidationIssue> {
        let cleaner = DataCleaner;
        let record = FieldMapper.map_with_aliases(row);
        let value = |field| cleaner.normalize_null(record.get(field));
        let issue = |level, field, message: &str| ValidationIssue {
            row: row.line,
            level,
            field,
            message: message.to_string(),
        };

        let mut issues = Vec::new();

        if value(CanonicalField::ProductName).is_none() {
            issues.push(issue(
                IssueLevel::Error,
                CanonicalField::ProductName,
                "상품명이 없습니다",
            ));
        }

        match value(CanonicalField::Quantity) {
            None => issues.push(issue(
                IssueLevel::Warning,
                CanonicalField::Quantity,
                "수량이 없습니다",
            )),
            Some(quantity) if cleaner.parse_quantity(&quantity).is_none() => issues.push(issue(
                IssueLevel::Warning,
                CanonicalField::Quantity,
                "수량이 숫자가 아닙니다",
            )),
            Some(_) => {}
        }

        if let Some(price) = value(CanonicalField::UnitPrice) {
            if cleaner.parse_decimal(&price).is_none() {
                issues.push(issue(
                    IssueLevel::Warning,
                    CanonicalField::UnitPrice,
                    "단가가 숫자가 아닙니다",
                ));
            }
        }

        if value(CanonicalField::Contact).is_none() {
            issues.push(issue(
                IssueLevel::Warning,
                CanonicalField::Contact,
                "연락처가 없습니다",
            ));
        }

        if value(CanonicalField::Address).is_none() {
            issues.push(issue(
                IssueLevel::Warning,
                CanonicalField::Address,
                "주소가 없습니다",
            ));
        }

        issues
    }

    /// 生成质量报告
    pub fn validate(&self, table: &SourceTable) -> ValidationReport {
        let mut issues = Vec::new();
        let mut error_rows = 0;
        let mut warning_rows = 0;

        for row in &table.rows {
            let row_issues = self.validate_row(row);
            if row_issues.iter().any(|i| i.level == IssueLevel::Error) {
                error_rows += 1;
            } else if !row_issues.is_empty() {
                warning_rows += 1;
            }
            issues.extend(row_issues);
        }

        let total_rows = table.row_count();
        let valid_rows = total_rows - error_rows;
        let success_rate = if total_rows == 0 {
            0.0
        } else {
            (valid_rows as f64 * 1000.0 / total_rows as f64).round() / 10.0
        };

        info!(
            total_rows,
            valid_rows, error_rows, warning_rows, success_rate, "预览校验完成"
        );

        ValidationReport {
            is_valid: total_rows > 0 && error_rows == 0,
            total_rows,
            valid_rows,
            error_rows,
            warning_rows,
            success_rate,
            issues,
        }
    }
}
