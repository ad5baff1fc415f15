// ==========================================
// 采购单转换引擎 - 直接输入
// ==========================================
// 用途: 用户在表单中直接填写的单条订单
// 规则: 只保留标准字段键（camelCase 或显示名）,值按字面量处理
// ==========================================

use crate::domain::{CanonicalField, TransformedRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectInput {
    fields: BTreeMap<String, String>,
}

impl DirectInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 转为标准记录（未知键与 amount 被丢弃）
    pub fn to_record(&self) -> TransformedRecord {
        let mut record = TransformedRecord::new();
        for (key, value) in &self.fields {
            match CanonicalField::from_key(key) {
                Some(field) if !field.is_derived() => record.set(field, value.trim()),
                _ => debug!(key = %key, "非标准字段,已忽略"),
            }
        }
        record
    }

    /// 缺失或为空的必填字段
    pub fn missing_required_fields(&self) -> Vec<CanonicalField> {
        let record = self.to_record();
        CanonicalField::REQUIRED
            .into_iter()
            .filter(|field| record.get(*field).map_or(true, |v| v.is_empty()))
            .collect()
    }
}
