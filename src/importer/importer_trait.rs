// ==========================================
// 采购单转换引擎 - 导入管道 Trait
// ==========================================
// 职责: 定义解析与映射接口（不包含实现）
// 红线: 只接受显式参数,不依赖任何会话状态
// ==========================================

use crate::domain::{FixedValues, MappingRules, SourceTable, TransformedRecord};
use crate::importer::error::ImportResult;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 源文件字节 → SourceTable
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件字节为源表
    ///
    /// # 参数
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(SourceTable): 表头 + 非空数据行
    /// - Err: UnreadableSource / EmptySource / NoUsableSheet / RowExtractionAborted
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<SourceTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 源表行 → 标准订单记录
// 实现者: FieldMapper（field_mapper.rs）
pub trait FieldMapper: Send + Sync {
    /// 应用映射规则
    ///
    /// # 参数
    /// - table: 源表
    /// - rules: 映射规则（为空时使用内置别名映射）
    /// - fixed: 固定值（最后覆盖）
    ///
    /// # 返回
    /// - 每个源行对应一条记录；本步骤不会失败
    fn apply(
        &self,
        table: &SourceTable,
        rules: &MappingRules,
        fixed: &FixedValues,
    ) -> Vec<TransformedRecord>;
}
