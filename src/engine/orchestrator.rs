// ==========================================
// 采购单转换引擎 - 转换编排器
// ==========================================
// 用途: 协调导入层与生成层的执行顺序
// 流程 A（文件）: 读取源表 → 字段映射 → 生成采购单
// 流程 B（直接输入）: 单条记录 → 固定值覆盖 → 派生金额 → 生成采购单
// 红线: 每次调用独立,不持有任何会话状态
// ==========================================

use crate::config::{ConfigError, ConverterConfig};
use crate::domain::{
    FixedValues, GeneratedDocument, MappingRules, SourceRow, SourceTable, TransformedRecord,
    ValidationReport,
};
use crate::engine::direct_input::DirectInput;
use crate::generator::{DocumentGenerator, GeneratorError};
use crate::importer::field_mapper::{apply_fixed_values, finalize_record};
use crate::importer::{
    FieldMapper, FieldMapperImpl, ImportError, OrderValidator, UniversalFileParser,
};
use crate::perf::PerfGuard;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument, warn, Span};
use uuid::Uuid;

/// 预览默认行数
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

// ==========================================
// ConversionError - 转换错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Generate(#[from] GeneratorError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ==========================================
// SourcePreview - 源文件预览
// ==========================================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePreview {
    pub headers: Vec<String>,
    pub rows: Vec<SourceRow>,
    pub total_rows: usize,
    pub validation: ValidationReport,
}

// ==========================================
// ConversionOrchestrator - 转换编排器
// ==========================================
pub struct ConversionOrchestrator {
    parser: UniversalFileParser,
    field_mapper: Box<dyn FieldMapper>,
    validator: OrderValidator,
    generator: DocumentGenerator,
}

impl ConversionOrchestrator {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            parser: UniversalFileParser::new(config.detection),
            field_mapper: Box::new(FieldMapperImpl),
            validator: OrderValidator,
            generator: DocumentGenerator::new(config.generator),
        }
    }

    /// 从 JSON 配置文件创建
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, ConversionError> {
        let config = ConverterConfig::from_json_file(path)?;
        Ok(Self::new(config))
    }

    /// 替换字段映射器
    pub fn with_field_mapper(mut self, field_mapper: Box<dyn FieldMapper>) -> Self {
        self.field_mapper = field_mapper;
        self
    }

    /// 读取源文件
    pub fn read_source(
        &self,
        source: &[u8],
        extension: &str,
    ) -> Result<SourceTable, ConversionError> {
        Ok(self.parser.parse(source, extension)?)
    }

    /// 源表 → 标准记录
    pub fn map_records(
        &self,
        table: &SourceTable,
        rules: &MappingRules,
        fixed: &FixedValues,
    ) -> Vec<TransformedRecord> {
        self.field_mapper.apply(table, rules, fixed)
    }

    // ==========================================
    // 流程 A: 文件转换
    // ==========================================

    pub fn convert_file(
        &self,
        source: &[u8],
        extension: &str,
        template: Option<&[u8]>,
        rules: &MappingRules,
        fixed: &FixedValues,
    ) -> Result<GeneratedDocument, ConversionError> {
        self.convert_file_at(source, extension, template, rules, fixed, Utc::now())
    }

    #[instrument(
        skip(self, source, template, rules, fixed, now),
        fields(conversion_id = tracing::field::Empty)
    )]
    pub fn convert_file_at(
        &self,
        source: &[u8],
        extension: &str,
        template: Option<&[u8]>,
        rules: &MappingRules,
        fixed: &FixedValues,
        now: DateTime<Utc>,
    ) -> Result<GeneratedDocument, ConversionError> {
        let _perf = PerfGuard::new("convert_file");
        let conversion_id = Uuid::new_v4().to_string();
        Span::current().record("conversion_id", conversion_id.as_str());

        info!(
            conversion_id = %conversion_id,
            bytes = source.len(),
            has_template = template.is_some(),
            "开始文件转换"
        );

        // === 步骤 1: 读取源表 ===
        let table = self.read_source(source, extension).map_err(|e| {
            warn!(error = %e, "源文件读取失败");
            e
        })?;

        // === 步骤 2: 字段映射 ===
        let missing = rules.missing_required_fields();
        if rules.is_provided() && !missing.is_empty() {
            warn!(missing = ?missing, "映射规则缺少必填字段");
        }
        let records = self.map_records(&table, rules, fixed);

        // === 步骤 3: 生成采购单 ===
        let document = self.generator.generate_at(template, &records, now)?;

        info!(
            conversion_id = %conversion_id,
            processed_rows = document.processed_rows,
            total_rows = document.total_rows,
            rendering = ?document.rendering,
            "文件转换完成"
        );
        Ok(document)
    }

    // ==========================================
    // 流程 B: 直接输入
    // ==========================================

    pub fn convert_direct_input(
        &self,
        template: Option<&[u8]>,
        input: &DirectInput,
        fixed: &FixedValues,
    ) -> Result<GeneratedDocument, ConversionError> {
        self.convert_direct_input_at(template, input, fixed, Utc::now())
    }

    #[instrument(
        skip(self, template, input, fixed, now),
        fields(conversion_id = tracing::field::Empty)
    )]
    pub fn convert_direct_input_at(
        &self,
        template: Option<&[u8]>,
        input: &DirectInput,
        fixed: &FixedValues,
        now: DateTime<Utc>,
    ) -> Result<GeneratedDocument, ConversionError> {
        let _perf = PerfGuard::new("convert_direct_input");
        let conversion_id = Uuid::new_v4().to_string();
        Span::current().record("conversion_id", conversion_id.as_str());

        let mut record = input.to_record();
        apply_fixed_values(&mut record, fixed);
        finalize_record(&mut record);

        info!(
            conversion_id = %conversion_id,
            fields = record.len(),
            "开始直接输入转换"
        );

        let document = self
            .generator
            .generate_at(template, std::slice::from_ref(&record), now)?;
        Ok(document)
    }

    // ==========================================
    // 预览
    // ==========================================

    /// 预览源文件前 limit 行并生成质量报告
    #[instrument(skip(self, source))]
    pub fn preview(
        &self,
        source: &[u8],
        extension: &str,
        limit: usize,
    ) -> Result<SourcePreview, ConversionError> {
        let _perf = PerfGuard::new("preview");
        let table = self.read_source(source, extension)?;
        let validation = self.validator.validate(&table);

        let total_rows = table.row_count();
        let SourceTable { headers, mut rows } = table;
        rows.truncate(limit);

        Ok(SourcePreview {
            headers,
            rows,
            total_rows,
            validation,
        })
    }
}

impl Default for ConversionOrchestrator {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}
