// ==========================================
// 采购单转换引擎 - 领域模型层
// ==========================================
// 职责: 定义源表、映射规则、标准记录、生成结果
// 红线: 不含解析逻辑,不含渲染逻辑
// ==========================================

pub mod document;
pub mod mapping;
pub mod order;
pub mod sheet;
pub mod validation;

// 重导出核心类型
pub use document::{GeneratedDocument, RenderPath, RowDiagnostic, XLSX_MIME_TYPE};
pub use mapping::{FieldSource, FixedValues, MappingDocument, MappingRules, LITERAL_MARKER};
pub use order::{CanonicalField, TransformedRecord};
pub use sheet::{
    HeaderCandidate, HeaderColumn, RawCell, RawSheet, SheetCandidate, SourceRow, SourceTable,
};
pub use validation::{IssueLevel, ValidationIssue, ValidationReport};
