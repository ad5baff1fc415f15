// ==========================================
// 采购单转换引擎 - 映射规则模型
// ==========================================
// 职责: 字段映射规则 / 固定值 / 映射文档（线上格式）
// 红线: 字面量与引用在解析时即区分,之后不再从字符串推断
// ==========================================

use crate::domain::order::CanonicalField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// 线上格式中的固定值标记: `[고정값: <value>]`
pub const LITERAL_MARKER: &str = "고정값";

// ==========================================
// FieldSource - 目标字段的取值来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FieldSource {
    /// 引用源表头（精确匹配）
    Reference(String),
    /// 固定字面量
    Literal(String),
}

impl FieldSource {
    /// 解析线上字符串
    ///
    /// `[고정값:` 前缀 + `]` 后缀 → Literal（内部值 TRIM），其余一律视为表头引用
    pub fn parse_wire(raw: &str) -> Self {
        let literal = raw
            .strip_prefix('[')
            .and_then(|rest| rest.strip_prefix(LITERAL_MARKER))
            .and_then(|rest| rest.strip_prefix(':'))
            .and_then(|rest| rest.strip_suffix(']'));

        match literal {
            Some(value) => FieldSource::Literal(value.trim().to_string()),
            None => FieldSource::Reference(raw.to_string()),
        }
    }

    /// 还原为线上字符串
    pub fn to_wire(&self) -> String {
        match self {
            FieldSource::Reference(name) => name.clone(),
            FieldSource::Literal(value) => format!("[{}: {}]", LITERAL_MARKER, value),
        }
    }
}

// ==========================================
// MappingRules - 目标字段 → 取值来源
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingRules {
    rules: BTreeMap<CanonicalField, FieldSource>,

    /// 调用方是否提供过规则（含被忽略的条目）
    #[serde(skip)]
    supplied: bool,
}

impl MappingRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// 派生字段 amount 不可映射，忽略
    pub fn insert(&mut self, target: CanonicalField, source: FieldSource) {
        self.supplied = true;
        if target.is_derived() {
            warn!(target_field = %target, "派生字段不可映射,已忽略");
            return;
        }
        self.rules.insert(target, source);
    }

    pub fn with(mut self, target: CanonicalField, source: FieldSource) -> Self {
        self.insert(target, source);
        self
    }

    pub fn get(&self, target: CanonicalField) -> Option<&FieldSource> {
        self.rules.get(&target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &FieldSource)> {
        self.rules.iter().map(|(k, v)| (*k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// 是否提供了规则
    ///
    /// 规则条目全部被忽略时仍视为已提供,此时不回退到内置别名
    pub fn is_provided(&self) -> bool {
        self.supplied || !self.rules.is_empty()
    }

    /// 尚未映射的必填字段
    pub fn missing_required_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::REQUIRED
            .into_iter()
            .filter(|field| !self.rules.contains_key(field))
            .collect()
    }

    /// 从线上格式（目标键 → 字符串）构建
    pub fn from_wire<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rules = MappingRules::new();
        for (key, raw) in entries {
            rules.supplied = true;
            match CanonicalField::from_key(key) {
                Some(field) => rules.insert(field, FieldSource::parse_wire(raw)),
                None => warn!(target_field = key, "未知目标字段,已忽略"),
            }
        }
        rules
    }
}

// ==========================================
// FixedValues - 固定值（最后覆盖）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedValues {
    values: BTreeMap<CanonicalField, String>,
}

impl FixedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: CanonicalField, value: impl Into<String>) {
        if target.is_derived() {
            warn!(target_field = %target, "派生字段不可设置固定值,已忽略");
            return;
        }
        self.values.insert(target, value.into());
    }

    pub fn with(mut self, target: CanonicalField, value: impl Into<String>) -> Self {
        self.insert(target, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn from_wire<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut fixed = FixedValues::new();
        for (key, value) in entries {
            match CanonicalField::from_key(key) {
                Some(field) => fixed.insert(field, value),
                None => warn!(target_field = key, "未知固定值字段,已忽略"),
            }
        }
        fixed
    }
}

// ==========================================
// MappingDocument - 映射文档（JSON 线上格式）
// ==========================================
// 形如: { "name": "...", "rules": { "상품명": "품목" }, "fixedValues": { "주소": "..." } }
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub rules: BTreeMap<String, String>,

    #[serde(default)]
    pub fixed_values: BTreeMap<String, String>,
}

impl MappingDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 转为内部类型（规则 + 固定值）
    pub fn to_parts(&self) -> (MappingRules, FixedValues) {
        let rules = MappingRules::from_wire(
            self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        let fixed = FixedValues::from_wire(
            self.fixed_values
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        (rules, fixed)
    }
}
