// ==========================================
// 发注书生成降级测试
// ==========================================
// 测试目标: 模板相关失败不向外抛错,降级结果的记录与合计一致
// ==========================================

mod test_helpers;

use calamine::Dimensions;
use purchase_order_converter::config::GeneratorConfig;
use purchase_order_converter::domain::{CanonicalField, RenderPath, TransformedRecord};
use purchase_order_converter::generator::{
    CachedValue, CellValue, DocumentGenerator, TemplateCell, TemplateLoadOutcome, TemplateSheet,
};
use test_helpers::*;

fn records() -> Vec<TransformedRecord> {
    let mut first: TransformedRecord = vec![
        (CanonicalField::ProductName, "사과".to_string()),
        (CanonicalField::Quantity, "10".to_string()),
        (CanonicalField::UnitPrice, "1000".to_string()),
    ]
    .into_iter()
    .collect();
    let mut second: TransformedRecord = vec![
        (CanonicalField::ProductName, "배".to_string()),
        (CanonicalField::Quantity, "5".to_string()),
        (CanonicalField::UnitPrice, "2000".to_string()),
    ]
    .into_iter()
    .collect();

    // 金额由映射阶段派生,这里直接走完整映射管道
    for record in [&mut first, &mut second] {
        purchase_order_converter::importer::field_mapper::finalize_record(record);
    }
    vec![first, second]
}

/// 读取从 start 行开始的 n 条记录 + 合计行（品名/数量/金额）
fn data_block(bytes: &[u8], start: u32, n: u32) -> Vec<(String, String, String)> {
    let (_, range) = read_first_sheet(bytes).unwrap();
    (start..=start + n)
        .map(|row| {
            (
                cell_text(&range, row, 2),
                cell_text(&range, row, 3),
                cell_text(&range, row, 5),
            )
        })
        .collect()
}

fn bare_reference() -> Vec<(String, String, String)> {
    let doc = DocumentGenerator::default()
        .generate_at(None, &records(), fixed_now())
        .unwrap();
    assert_eq!(doc.rendering, RenderPath::Bare);
    data_block(&doc.content, 2, 2)
}

#[test]
fn test_bare_reference_block() {
    assert_eq!(
        bare_reference(),
        vec![
            ("사과".to_string(), "10".to_string(), "10000".to_string()),
            ("배".to_string(), "5".to_string(), "10000".to_string()),
            ("합계".to_string(), "15".to_string(), "20000".to_string()),
        ]
    );
}

#[test]
fn test_garbage_template_falls_back_silently() {
    let doc = DocumentGenerator::default()
        .generate_at(Some(&b"this is not a workbook"[..]), &records(), fixed_now())
        .unwrap();

    assert_eq!(doc.rendering, RenderPath::Bare);
    assert_eq!(doc.processed_rows, 2);
    assert_eq!(data_block(&doc.content, 2, 2), bare_reference());
}

#[test]
fn test_unserializable_template_falls_back() {
    let sheet = TemplateSheet::from_cells(
        "양식",
        vec![(
            (0, 0),
            TemplateCell::Static(CellValue::Text("x".repeat(40_000))),
        )],
    );

    let doc = DocumentGenerator::default()
        .run(TemplateLoadOutcome::Loaded(sheet), &records(), fixed_now())
        .unwrap();

    assert_eq!(doc.rendering, RenderPath::Bare);
    assert_eq!(doc.total_rows, 2);
    assert!(doc.errors.is_empty());
    assert_eq!(data_block(&doc.content, 2, 2), bare_reference());
}

#[test]
fn test_broken_formula_result_falls_back() {
    let sheet = TemplateSheet::from_cells(
        "양식",
        vec![(
            (0, 3),
            TemplateCell::Formula {
                formula: "1/0".to_string(),
                cached: CachedValue::Error("Div0".to_string()),
            },
        )],
    );

    let doc = DocumentGenerator::default()
        .run(TemplateLoadOutcome::Loaded(sheet), &records(), fixed_now())
        .unwrap();
    assert_eq!(doc.rendering, RenderPath::Bare);
}

#[test]
fn test_invalid_template_sheet_name_falls_back() {
    // 工作表名不能包含 '['
    let sheet = TemplateSheet::from_cells("[양식]", Vec::new());
    let doc = DocumentGenerator::default()
        .run(TemplateLoadOutcome::Loaded(sheet), &records(), fixed_now())
        .unwrap();
    assert_eq!(doc.rendering, RenderPath::Bare);
}

#[test]
fn test_templated_block_matches_bare_block() {
    let template = build_template();
    let generator = DocumentGenerator::new(GeneratorConfig::default());
    let doc = generator
        .generate_at(Some(&template), &records(), fixed_now())
        .unwrap();

    assert_eq!(doc.rendering, RenderPath::Templated);
    // 模板标记在第 4 行,数据从第 5 行开始
    assert_eq!(data_block(&doc.content, 4, 2), bare_reference());
}

#[test]
fn test_template_load_reads_first_sheet_and_formulas() {
    let template = build_template();
    let sheet = TemplateSheet::load(&template).unwrap();

    assert_eq!(sheet.name, "발주양식");
    assert_eq!(sheet.formula_count(), 1);
    assert_eq!(sheet.merges().len(), 1);
    assert_eq!(sheet.data_start_row(&GeneratorConfig::default()), 4);
    assert!(matches!(
        sheet.cell(0, 5),
        Some(TemplateCell::Formula {
            cached: CachedValue::Number(n),
            ..
        }) if *n == 2.0
    ));
}

#[test]
fn test_templated_output_keeps_template_merges() {
    let template = build_template();
    let doc = DocumentGenerator::default()
        .generate_at(Some(&template), &records(), fixed_now())
        .unwrap();
    assert_eq!(doc.rendering, RenderPath::Templated);

    let merges = read_first_sheet_merges(&doc.content).unwrap();
    assert_eq!(merges, vec![Dimensions::new((0, 0), (0, 4))]);

    let (_, range) = read_first_sheet(&doc.content).unwrap();
    assert_eq!(cell_text(&range, 0, 0), "주식회사 예시 발주서");
}
