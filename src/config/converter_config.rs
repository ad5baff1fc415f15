// ==========================================
// 采购单转换引擎 - 转换配置
// ==========================================
// 职责: 启发式评分参数 + 采购单版式参数
// 说明: 阈值与权重均为经验值,全部可由 JSON 覆写
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    FileReadError(String),

    #[error("配置解析失败: {0}")]
    ParseError(String),

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::FileReadError(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

// ==========================================
// ConverterConfig - 顶层配置
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl ConverterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ConverterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detection.validate()?;
        self.generator.validate()
    }
}

// ==========================================
// KeywordRule - 关键词加分规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub tokens: Vec<String>,
    pub weight: i64,
}

impl KeywordRule {
    fn new(tokens: &[&str], weight: i64) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            weight,
        }
    }

    /// 单元格文本（小写后）包含任一关键词即命中
    pub fn matches(&self, lowered: &str) -> bool {
        self.tokens
            .iter()
            .any(|token| lowered.contains(&token.to_lowercase()))
    }
}

// ==========================================
// DetectionConfig - 工作表/表头识别参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    // ===== 工作表评分 =====
    pub sheet_positive_tokens: Vec<String>,
    pub sheet_negative_tokens: Vec<String>,
    pub sheet_positive_bonus: f64,
    pub sheet_negative_penalty: f64,
    pub sheet_row_divisor: f64,
    pub sheet_row_score_cap: f64,
    pub sheet_column_score_cap: f64,
    pub sheet_min_rows: usize,

    // ===== 表头评分 =====
    pub header_scan_rows: usize,
    pub header_scan_columns: usize,
    pub min_header_score: i64,
    pub header_keywords: Vec<KeywordRule>,
    pub non_empty_cell_weight: i64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sheet_positive_tokens: ["sheet", "data", "order", "데이터", "주문"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            sheet_negative_tokens: ["summary", "pivot", "요약", "피벗"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            sheet_positive_bonus: 10.0,
            sheet_negative_penalty: 20.0,
            sheet_row_divisor: 10.0,
            sheet_row_score_cap: 20.0,
            sheet_column_score_cap: 10.0,
            sheet_min_rows: 2,

            header_scan_rows: 10,
            header_scan_columns: 50,
            min_header_score: 5,
            header_keywords: vec![
                KeywordRule::new(&["상품", "제품", "품목", "product"], 10),
                KeywordRule::new(&["수량", "qty", "quantity"], 10),
                KeywordRule::new(&["가격", "단가", "price"], 10),
                KeywordRule::new(&["고객", "주문자", "이름", "성", "customer"], 8),
                KeywordRule::new(&["연락", "전화", "휴대폰", "phone", "tel"], 8),
                KeywordRule::new(&["주소", "배송", "address"], 8),
                KeywordRule::new(&["이메일", "email"], 5),
            ],
            non_empty_cell_weight: 1,
        }
    }
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.sheet_row_divisor <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "detection.sheet_row_divisor".to_string(),
                message: "必须大于 0".to_string(),
            });
        }
        if self.header_scan_rows == 0 || self.header_scan_columns == 0 {
            return Err(ConfigError::InvalidValue {
                key: "detection.header_scan_rows/header_scan_columns".to_string(),
                message: "扫描窗口不能为 0".to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// GeneratorConfig - 采购单版式参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 无模板时的工作表名与标题
    pub sheet_title: String,
    /// 模板中标记数据区的表头文字（不区分大小写）
    pub data_start_markers: Vec<String>,
    pub marker_scan_rows: usize,
    pub marker_scan_columns: usize,
    /// 找不到标记时的数据起始行（1-based）
    pub default_data_start_row: usize,
    pub total_label: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sheet_title: "발주서".to_string(),
            data_start_markers: vec!["NO".to_string(), "번호".to_string(), "순번".to_string()],
            marker_scan_rows: 10,
            marker_scan_columns: 10,
            default_data_start_row: 3,
            total_label: "합계".to_string(),
        }
    }
}

const SHEET_NAME_FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

impl GeneratorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        // 表头行写在数据起始行上一行，所以最小为 2
        if self.default_data_start_row < 2 {
            return Err(ConfigError::InvalidValue {
                key: "generator.default_data_start_row".to_string(),
                message: "必须 >= 2".to_string(),
            });
        }
        if self.sheet_title.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "generator.sheet_title".to_string(),
                message: "不能为空".to_string(),
            });
        }
        // xlsx 工作表名规则
        if self.sheet_title.chars().count() > 31 {
            return Err(ConfigError::InvalidValue {
                key: "generator.sheet_title".to_string(),
                message: "不能超过 31 个字符".to_string(),
            });
        }
        if let Some(c) = self.sheet_title.chars().find(|c| SHEET_NAME_FORBIDDEN.contains(c)) {
            return Err(ConfigError::InvalidValue {
                key: "generator.sheet_title".to_string(),
                message: format!("不能包含字符 '{}'", c),
            });
        }
        if self.sheet_title.starts_with('\'') || self.sheet_title.ends_with('\'') {
            return Err(ConfigError::InvalidValue {
                key: "generator.sheet_title".to_string(),
                message: "不能以单引号开头或结尾".to_string(),
            });
        }
        Ok(())
    }
}
