// ==========================================
// 采购单转换引擎 - 导入层
// ==========================================
// 职责: 源文件字节 → SourceTable → 标准订单记录
// 支持: Excel (.xlsx/.xls), CSV
// 流程: 选表 → 表头识别 → 数据行提取 → 字段映射
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod header_detector;
pub mod importer_trait;
pub mod row_extractor;
pub mod sheet_selector;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use dq_validator::OrderValidator;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper as FieldMapperImpl, DEFAULT_ALIASES};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use header_detector::HeaderDetector;
pub use row_extractor::{Extraction, RowExtractor, RowRead, SkipReason};
pub use sheet_selector::{SheetSelector, SheetSlot};

// 重导出 Trait 接口
pub use importer_trait::{FieldMapper, FileParser};
