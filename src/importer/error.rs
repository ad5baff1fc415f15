// ==========================================
// 采购单转换引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有整文件级错误才会出现在这里,单元格/单行错误就地降级
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("无法读取源文件: {0}")]
    UnreadableSource(String),

    #[error("源文件没有数据行")]
    EmptySource,

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构错误 =====
    #[error("工作簿中没有工作表")]
    NoUsableSheet,

    #[error("工作表 {sheet} 行提取中止: {message}")]
    RowExtractionAborted { sheet: String, message: String },
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::UnreadableSource(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
