// ==========================================
// 采购单转换引擎 - 数据清洗器
// ==========================================
// 职责: 单元格文本 TRIM / 数值解析 / 数值格式化
// 口径: 数量取整数（截断小数）,单价与金额取浮点
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析浮点数（允许千分位逗号）
    ///
    /// 空值 / 非数字 / 非有限值 → None
    pub fn parse_decimal(&self, value: &str) -> Option<f64> {
        let compact: String = value
            .trim()
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        if compact.is_empty() {
            return None;
        }
        compact.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 解析数量（整数,小数部分截断）
    pub fn parse_quantity(&self, value: &str) -> Option<i64> {
        self.parse_decimal(value)
            .map(f64::trunc)
            .filter(|v| v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    }

    /// 数值转文本（整数值不带小数点）
    pub fn format_number(&self, value: f64) -> String {
        format!("{}", value)
    }

    /// 金额派生: 数量 × 单价,任一无法解析则不派生
    pub fn derive_amount(&self, quantity: Option<&str>, unit_price: Option<&str>) -> Option<f64> {
        let quantity = self.parse_quantity(quantity?)?;
        let unit_price = self.parse_decimal(unit_price?)?;
        Some(quantity as f64 * unit_price)
    }
}
