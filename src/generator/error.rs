// ==========================================
// 采购单转换引擎 - 文档生成错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单行错误转为 RowDiagnostic；模板路径错误触发降级；
//       只有无模板路径失败才会向调用方返回
// ==========================================

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("xlsx 写入失败: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("模板无法使用: {0}")]
    TemplateUnreadable(String),

    #[error("单元格文本过长: {column} 列 {length} 字符（上限 {limit}）")]
    CellLimitExceeded {
        column: &'static str,
        length: usize,
        limit: usize,
    },

    #[error("行号 {row} 超出工作表上限 {limit}")]
    SheetLimitExceeded { row: u64, limit: u64 },
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
