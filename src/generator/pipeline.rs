// ==========================================
// 采购单转换引擎 - 文档生成管道
// ==========================================
// 状态: TemplateLoad → Templated → Bare
// - TemplateLoad: Loaded(TemplateSheet) | Unavailable(原因)
// - Templated:    Success(文档) | FallbackRequired(原因)
// - Bare:         成功或致命错误
// 红线: 模板相关失败一律降级,调用方只会看到无模板路径的错误
// ==========================================

use crate::config::GeneratorConfig;
use crate::domain::{GeneratedDocument, TransformedRecord};
use crate::generator::bare::render_bare;
use crate::generator::error::GeneratorResult;
use crate::generator::template::TemplateSheet;
use crate::generator::templated::render_templated;
use crate::perf::PerfGuard;
use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

/// 模板加载结果
#[derive(Debug, Clone)]
pub enum TemplateLoadOutcome {
    Loaded(TemplateSheet),
    Unavailable(String),
}

/// 模板渲染结果
#[derive(Debug)]
pub enum StageOutcome {
    Success(GeneratedDocument),
    FallbackRequired(String),
}

pub struct DocumentGenerator {
    config: GeneratorConfig,
}

impl DocumentGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// 加载模板（未提供/无法读取 → Unavailable）
    pub fn load_template(&self, template: Option<&[u8]>) -> TemplateLoadOutcome {
        let Some(bytes) = template else {
            return TemplateLoadOutcome::Unavailable("未提供模板".to_string());
        };

        match TemplateSheet::load(bytes) {
            Ok(sheet) => TemplateLoadOutcome::Loaded(sheet),
            Err(e) => {
                warn!(error = %e, "模板加载失败");
                TemplateLoadOutcome::Unavailable(e.to_string())
            }
        }
    }

    /// 生成采购单（使用当前时间）
    pub fn generate(
        &self,
        template: Option<&[u8]>,
        records: &[TransformedRecord],
    ) -> GeneratorResult<GeneratedDocument> {
        self.generate_at(template, records, Utc::now())
    }

    /// 生成采购单（指定时间,用于发注编号/日期/文件名）
    #[instrument(skip_all, fields(records = records.len(), has_template = template.is_some()))]
    pub fn generate_at(
        &self,
        template: Option<&[u8]>,
        records: &[TransformedRecord],
        now: DateTime<Utc>,
    ) -> GeneratorResult<GeneratedDocument> {
        let _perf = PerfGuard::new("generate_purchase_order");
        let loaded = self.load_template(template);
        self.run(loaded, records, now)
    }

    /// 从模板加载结果开始推进管道
    pub fn run(
        &self,
        loaded: TemplateLoadOutcome,
        records: &[TransformedRecord],
        now: DateTime<Utc>,
    ) -> GeneratorResult<GeneratedDocument> {
        let reason = match loaded {
            TemplateLoadOutcome::Loaded(sheet) => {
                match render_templated(&sheet, records, now, &self.config) {
                    StageOutcome::Success(document) => return Ok(document),
                    StageOutcome::FallbackRequired(reason) => reason,
                }
            }
            TemplateLoadOutcome::Unavailable(reason) => reason,
        };

        info!(reason = %reason, "使用无模板路径生成");
        render_bare(records, now, &self.config)
    }
}

impl Default for DocumentGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
