// ==========================================
// 采购单转换引擎 - 配置层
// ==========================================
// 职责: 启发式参数与版式参数,默认值 + JSON 覆写
// ==========================================

pub mod converter_config;

// 重导出核心配置
pub use converter_config::{
    ConfigError, ConverterConfig, DetectionConfig, GeneratorConfig, KeywordRule,
};
