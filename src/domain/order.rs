// ==========================================
// 采购单转换引擎 - 标准订单记录
// ==========================================
// 职责: 标准字段集合 + 映射后的订单记录
// 红线: 记录中不允许出现标准字段以外的键
// 红线: amount 只能派生,不能直接映射
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// CanonicalField - 标准字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    ProductName,  // 상품명
    Quantity,     // 수량
    UnitPrice,    // 단가
    CustomerName, // 고객명
    Contact,      // 연락처
    Address,      // 주소
    Amount,       // 금액（派生）
}

impl CanonicalField {
    /// 可映射字段（不含派生字段 amount）
    pub const MAPPABLE: [CanonicalField; 6] = [
        CanonicalField::ProductName,
        CanonicalField::Quantity,
        CanonicalField::UnitPrice,
        CanonicalField::CustomerName,
        CanonicalField::Contact,
        CanonicalField::Address,
    ];

    /// 标准采购单必填字段
    pub const REQUIRED: [CanonicalField; 3] = [
        CanonicalField::ProductName,
        CanonicalField::Contact,
        CanonicalField::Address,
    ];

    /// 线上格式的字段键（camelCase）
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::ProductName => "productName",
            CanonicalField::Quantity => "quantity",
            CanonicalField::UnitPrice => "unitPrice",
            CanonicalField::CustomerName => "customerName",
            CanonicalField::Contact => "contact",
            CanonicalField::Address => "address",
            CanonicalField::Amount => "amount",
        }
    }

    /// 界面显示的字段名
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::ProductName => "상품명",
            CanonicalField::Quantity => "수량",
            CanonicalField::UnitPrice => "단가",
            CanonicalField::CustomerName => "고객명",
            CanonicalField::Contact => "연락처",
            CanonicalField::Address => "주소",
            CanonicalField::Amount => "금액",
        }
    }

    /// 解析字段键，同时接受 camelCase 键与显示名
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        [
            CanonicalField::ProductName,
            CanonicalField::Quantity,
            CanonicalField::UnitPrice,
            CanonicalField::CustomerName,
            CanonicalField::Contact,
            CanonicalField::Address,
            CanonicalField::Amount,
        ]
        .into_iter()
        .find(|field| field.key() == key || field.label() == key)
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, CanonicalField::Amount)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ==========================================
// TransformedRecord - 映射后的订单记录
// ==========================================
// 用途: MappingEngine 输出, DocumentGenerator 输入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformedRecord {
    fields: BTreeMap<CanonicalField, String>,
}

impl TransformedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入可映射字段
    ///
    /// amount 是派生字段，这里直接忽略，只能通过 `set_amount` 写入
    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        if field.is_derived() {
            return;
        }
        self.fields.insert(field, value.into());
    }

    pub(crate) fn set_amount(&mut self, amount: Option<String>) {
        match amount {
            Some(value) => {
                self.fields.insert(CanonicalField::Amount, value);
            }
            None => {
                self.fields.remove(&CanonicalField::Amount);
            }
        }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// 缺失字段按空字符串处理（渲染口径）
    pub fn get_or_empty(&self, field: CanonicalField) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(CanonicalField, String)> for TransformedRecord {
    fn from_iter<I: IntoIterator<Item = (CanonicalField, String)>>(iter: I) -> Self {
        let mut record = TransformedRecord::new();
        for (field, value) in iter {
            record.set(field, value);
        }
        record
    }
}
