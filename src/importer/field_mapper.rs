// ==========================================
// 采购单转换引擎 - 字段映射器实现
// ==========================================
// 职责: 源表行 → 标准订单记录
// 顺序: 映射规则（或内置别名）→ 固定值覆盖 → 派生金额
// 红线: 本步骤不会失败；记录中只出现标准字段
// ==========================================

use crate::domain::{
    CanonicalField, FieldSource, FixedValues, MappingRules, SourceRow, SourceTable,
    TransformedRecord,
};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::FieldMapper as FieldMapperTrait;
use tracing::{debug, info};

/// 内置别名表（未提供映射规则时使用,按顺序取第一个存在的表头）
pub const DEFAULT_ALIASES: [(CanonicalField, &[&str]); 6] = [
    (
        CanonicalField::ProductName,
        &["상품명", "품목명", "제품명", "product"],
    ),
    (
        CanonicalField::Quantity,
        &["수량", "주문수량", "quantity", "qty"],
    ),
    (
        CanonicalField::UnitPrice,
        &["단가", "가격", "price", "unit_price"],
    ),
    (
        CanonicalField::CustomerName,
        &["고객명", "주문자", "배송받는분", "customer"],
    ),
    (
        CanonicalField::Contact,
        &["연락처", "전화번호", "phone", "tel"],
    ),
    (CanonicalField::Address, &["주소", "배송지", "address"]),
];

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn apply(
        &self,
        table: &SourceTable,
        rules: &MappingRules,
        fixed: &FixedValues,
    ) -> Vec<TransformedRecord> {
        let use_defaults = !rules.is_provided();
        info!(
            rows = table.row_count(),
            rules = rules.len(),
            use_defaults,
            "开始字段映射"
        );

        table
            .rows
            .iter()
            .map(|row| {
                let mut record = if use_defaults {
                    self.map_with_aliases(row)
                } else {
                    self.map_with_rules(row, rules)
                };
                apply_fixed_values(&mut record, fixed);
                finalize_record(&mut record);
                record
            })
            .collect()
    }
}

impl FieldMapper {
    /// 内置别名映射
    pub fn map_with_aliases(&self, row: &SourceRow) -> TransformedRecord {
        let mut record = TransformedRecord::new();
        for (field, aliases) in DEFAULT_ALIASES {
            if let Some(value) = aliases.iter().find_map(|alias| row.get(alias)) {
                record.set(field, value);
            }
        }
        record
    }

    /// 显式规则映射
    ///
    /// Reference 指向的表头不在行中时该字段缺省
    pub fn map_with_rules(&self, row: &SourceRow, rules: &MappingRules) -> TransformedRecord {
        let mut record = TransformedRecord::new();
        for (field, source) in rules.iter() {
            match source {
                FieldSource::Literal(value) => record.set(field, value.as_str()),
                FieldSource::Reference(header) => match row.get(header) {
                    Some(value) => record.set(field, value),
                    None => debug!(
                        line = row.line,
                        target_field = %field,
                        header = %header,
                        "引用的表头不存在"
                    ),
                },
            }
        }
        record
    }
}

/// 固定值最后覆盖
pub fn apply_fixed_values(record: &mut TransformedRecord, fixed: &FixedValues) {
    for (field, value) in fixed.iter() {
        record.set(field, value);
    }
}

/// 派生金额: 数量与单价都能解析时才写入
pub fn finalize_record(record: &mut TransformedRecord) {
    let cleaner = DataCleaner;
    let amount = cleaner
        .derive_amount(
            record.get(CanonicalField::Quantity),
            record.get(CanonicalField::UnitPrice),
        )
        .map(|value| cleaner.format_number(value));
    record.set_amount(amount);
}
