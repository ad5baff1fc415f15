// ==========================================
// 采购单转换引擎 - 文档生成层
// ==========================================
// 职责: 标准订单记录 → 采购单 xlsx
// 路径: 模板渲染优先,失败降级为无模板渲染
// ==========================================

pub mod bare;
pub mod canvas;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod template;
pub mod templated;

pub use bare::render_bare;
pub use canvas::{Canvas, CellStyle, CellValue};
pub use error::{GeneratorError, GeneratorResult};
pub use layout::{
    excel_serial, order_number, output_file_name, OrderLine, Totals, MAX_CELL_TEXT_LEN,
    OUTPUT_HEADERS,
};
pub use pipeline::{DocumentGenerator, StageOutcome, TemplateLoadOutcome};
pub use template::{CachedValue, TemplateCell, TemplateSheet};
pub use templated::render_templated;
