// ==========================================
// 采购单转换引擎 - 生成结果模型
// ==========================================
// 红线: processed_rows + errors.len() == total_rows
// ==========================================

use serde::{Deserialize, Serialize};

/// 输出文件 MIME 类型
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 实际使用的渲染路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderPath {
    Templated,
    Bare,
}

/// 单行渲染失败记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDiagnostic {
    /// 记录序号（1-based）
    pub row: usize,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub file_name: String,

    /// xlsx 字节流（不进入元数据序列化）
    #[serde(skip)]
    pub content: Vec<u8>,

    pub processed_rows: usize,
    pub total_rows: usize,
    pub errors: Vec<RowDiagnostic>,
    pub rendering: RenderPath,
}

impl GeneratedDocument {
    pub fn mime_type(&self) -> &'static str {
        XLSX_MIME_TYPE
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
