// ==========================================
// 采购单转换引擎 - 编排层
// ==========================================
// 职责: 对外暴露文件转换 / 直接输入 / 预览三个入口
// 红线: 只接受字节与显式参数,不做存储与传输
// ==========================================

pub mod direct_input;
pub mod orchestrator;

pub use direct_input::DirectInput;
pub use orchestrator::{
    ConversionError, ConversionOrchestrator, SourcePreview, DEFAULT_PREVIEW_ROWS,
};
