// ==========================================
// 采购单转换引擎 - 核心库
// ==========================================
// 职责: 任意订单导出表（Excel/CSV）→ 标准发注书 xlsx
// 流程: 选表 → 表头识别 → 数据行提取 → 字段映射 → 生成
// 定位: 只处理字节与元数据,不含传输/存储/界面
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 源文件解析与字段映射
pub mod importer;

// 生成层 - 采购单 xlsx
pub mod generator;

// 编排层 - 对外入口
pub mod engine;

// 配置层 - 启发式与版式参数
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    CanonicalField, FieldSource, FixedValues, GeneratedDocument, MappingDocument, MappingRules,
    RenderPath, RowDiagnostic, SourceTable, TransformedRecord, ValidationReport,
};

// 编排
pub use engine::{ConversionError, ConversionOrchestrator, DirectInput, SourcePreview};

// 配置
pub use config::ConverterConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "발주서 변환기";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
