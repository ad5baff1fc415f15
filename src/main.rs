// ==========================================
// 采购单转换引擎 - 命令行入口
// ==========================================
// 子命令: convert（文件转换）/ direct（直接输入）/ preview（预览）
// 输出: 生成文件写入 --out-dir,元数据 JSON 打印到 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use purchase_order_converter::domain::{FixedValues, MappingDocument, MappingRules};
use purchase_order_converter::engine::DEFAULT_PREVIEW_ROWS;
use purchase_order_converter::logging::{self, LogFormat};
use purchase_order_converter::{
    ConversionOrchestrator, DirectInput, GeneratedDocument, APP_NAME, VERSION,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "po-convert",
    version,
    about = "주문서(Excel/CSV)를 표준 발주서(xlsx)로 변환합니다"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON 설정 파일 (휴리스틱/양식 파라미터)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// 발주서 저장 디렉터리
    #[arg(long = "out-dir", value_name = "DIR", default_value = ".", global = true)]
    out_dir: PathBuf,

    /// 로그 출력 형식
    #[arg(long = "log-format", value_enum, default_value = "text", global = true)]
    log_format: LogFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// 주문서 파일을 발주서로 변환
    Convert {
        /// 원본 주문서 (.xlsx/.xls/.csv)
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// 발주서 템플릿 (.xlsx)
        #[arg(long, value_name = "PATH")]
        template: Option<PathBuf>,

        /// 매핑 문서 (JSON: name / rules / fixedValues)
        #[arg(long, value_name = "PATH")]
        mapping: Option<PathBuf>,
    },

    /// 직접 입력한 주문 1건을 발주서로 변환
    Direct {
        /// 필드 값 (예: --field 상품명=사과)
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,

        /// 고정값 (예: --fixed 주소=본사)
        #[arg(long = "fixed", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        fixed: Vec<(String, String)>,

        /// 발주서 템플릿 (.xlsx)
        #[arg(long, value_name = "PATH")]
        template: Option<PathBuf>,
    },

    /// 주문서 미리보기 및 데이터 검증
    Preview {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// 미리보기 행 수
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        limit: usize,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("KEY=VALUE 형식이 아닙니다: {}", raw)),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_with_format(match cli.log_format {
        LogFormatArg::Text => LogFormat::Text,
        LogFormatArg::Json => LogFormat::Json,
    });

    if let Err(error) = run(cli) {
        eprintln!("error: {:#}", error);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    tracing::info!(app = APP_NAME, version = VERSION, "시작");
    let orchestrator = match &cli.config {
        Some(path) => ConversionOrchestrator::from_config_file(path)
            .with_context(|| format!("설정 파일을 읽을 수 없습니다: {}", path.display()))?,
        None => ConversionOrchestrator::default(),
    };

    match cli.command {
        Command::Convert {
            source,
            template,
            mapping,
        } => {
            let bytes = read_file(&source)?;
            let extension = source
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_default()
                .to_string();
            let template = template.as_deref().map(read_file).transpose()?;
            let (rules, fixed) = match mapping {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("매핑 문서를 읽을 수 없습니다: {}", path.display()))?;
                    MappingDocument::from_json(&raw)
                        .with_context(|| format!("매핑 문서 형식 오류: {}", path.display()))?
                        .to_parts()
                }
                None => (MappingRules::new(), FixedValues::new()),
            };

            let document = orchestrator.convert_file(
                &bytes,
                &extension,
                template.as_deref(),
                &rules,
                &fixed,
            )?;
            emit(&cli.out_dir, &document)
        }
        Command::Direct {
            fields,
            fixed,
            template,
        } => {
            let input = fields
                .into_iter()
                .fold(DirectInput::new(), |input, (key, value)| input.with(key, value));
            let missing = input.missing_required_fields();
            if !missing.is_empty() {
                let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
                tracing::warn!(missing = ?labels, "필수 필드가 비어 있습니다");
            }
            let fixed = FixedValues::from_wire(fixed.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            let template = template.as_deref().map(read_file).transpose()?;

            let document = orchestrator.convert_direct_input(template.as_deref(), &input, &fixed)?;
            emit(&cli.out_dir, &document)
        }
        Command::Preview { source, limit } => {
            let bytes = read_file(&source)?;
            let extension = source
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_default()
                .to_string();
            let preview = orchestrator.preview(&bytes, &extension, limit)?;
            println!("{}", serde_json::to_string_pretty(&preview)?);
            Ok(())
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("파일을 읽을 수 없습니다: {}", path.display()))
}

fn emit(out_dir: &Path, document: &GeneratedDocument) -> Result<()> {
    if !out_dir.is_dir() {
        bail!("출력 디렉터리가 없습니다: {}", out_dir.display());
    }
    let path = out_dir.join(&document.file_name);
    std::fs::write(&path, &document.content)
        .with_context(|| format!("발주서를 저장할 수 없습니다: {}", path.display()))?;

    tracing::info!(path = %path.display(), "발주서 저장 완료");
    if document.has_errors() {
        tracing::warn!(
            failed_rows = document.errors.len(),
            processed_rows = document.processed_rows,
            "일부 행을 발주서에 쓰지 못했습니다"
        );
    }
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}
