// ==========================================
// 转换流程端到端测试
// ==========================================
// 测试目标: 源文件 → 映射 → 发注书 xlsx 的完整链路
// ==========================================

mod test_helpers;

use purchase_order_converter::domain::{
    CanonicalField, FieldSource, FixedValues, MappingDocument, MappingRules, RenderPath,
};
use purchase_order_converter::engine::{ConversionOrchestrator, DirectInput};
use purchase_order_converter::generator::MAX_CELL_TEXT_LEN;
use purchase_order_converter::logging;
use test_helpers::*;

const ORDERS_CSV: &str = "상품명,수량,단가,연락처,주소\n\
                          사과,10,1000,010-1111-2222,서울\n\
                          배,5,2000,010-3333-4444,부산\n";

#[test]
fn test_csv_round_trip_amounts_and_totals() {
    logging::init_test();

    let doc = ConversionOrchestrator::default()
        .convert_file_at(
            ORDERS_CSV.as_bytes(),
            "csv",
            None,
            &MappingRules::new(),
            &FixedValues::new(),
            fixed_now(),
        )
        .unwrap();

    assert_eq!(doc.processed_rows, 2);
    assert_eq!(doc.total_rows, 2);
    assert!(doc.errors.is_empty());
    assert_eq!(doc.rendering, RenderPath::Bare);
    assert_eq!(doc.file_name, "purchase_order_2026-10-19T08-30-15.xlsx");

    let (name, range) = read_first_sheet(&doc.content).unwrap();
    assert_eq!(name, "발주서");
    assert_eq!(cell_text(&range, 0, 0), "발주서");
    assert_eq!(cell_text(&range, 1, 0), "발주번호");
    assert_eq!(cell_text(&range, 1, 8), "주소");

    // 数据行
    assert_eq!(cell_text(&range, 2, 0), "ORD20261019-001");
    assert_eq!(cell_text(&range, 3, 0), "ORD20261019-002");
    assert_eq!(cell_text(&range, 2, 2), "사과");
    assert_eq!(cell_number(&range, 2, 5), Some(10000.0));
    assert_eq!(cell_number(&range, 3, 5), Some(10000.0));
    assert_eq!(cell_text(&range, 3, 7), "010-3333-4444");

    // 合计行
    assert_eq!(cell_text(&range, 4, 2), "합계");
    assert_eq!(cell_number(&range, 4, 3), Some(15.0));
    assert_eq!(cell_number(&range, 4, 5), Some(20000.0));
}

#[test]
fn test_fixed_values_override_literal_rules() {
    let rules = MappingRules::new()
        .with(
            CanonicalField::ProductName,
            FieldSource::Reference("상품명".to_string()),
        )
        .with(CanonicalField::Address, FieldSource::Literal("A".to_string()));
    let fixed = FixedValues::new().with(CanonicalField::Address, "B");

    let doc = ConversionOrchestrator::default()
        .convert_file_at(ORDERS_CSV.as_bytes(), "csv", None, &rules, &fixed, fixed_now())
        .unwrap();

    let (_, range) = read_first_sheet(&doc.content).unwrap();
    assert_eq!(cell_text(&range, 2, 8), "B");
    assert_eq!(cell_text(&range, 3, 8), "B");
    // 规则未映射数量 → 无金额,合计为 0
    assert_eq!(cell_text(&range, 2, 5), "");
    assert_eq!(cell_number(&range, 4, 5), Some(0.0));
}

#[test]
fn test_mapping_document_drives_conversion() {
    let csv = "품목,개수,가격,전화,배송주소\n연필,3,500,010-5555-6666,대구\n";
    let document = MappingDocument::from_json(
        r#"{
            "name": "문구점",
            "rules": {
                "productName": "품목",
                "quantity": "개수",
                "unitPrice": "가격",
                "contact": "전화",
                "address": "배송주소",
                "customerName": "[고정값: 김담당]"
            }
        }"#,
    )
    .unwrap();
    let (rules, fixed) = document.to_parts();
    assert!(rules.missing_required_fields().is_empty());

    let doc = ConversionOrchestrator::default()
        .convert_file_at(csv.as_bytes(), "csv", None, &rules, &fixed, fixed_now())
        .unwrap();

    let (_, range) = read_first_sheet(&doc.content).unwrap();
    assert_eq!(cell_text(&range, 2, 2), "연필");
    assert_eq!(cell_number(&range, 2, 5), Some(1500.0));
    assert_eq!(cell_text(&range, 2, 6), "김담당");
    assert_eq!(cell_text(&range, 2, 8), "대구");
}

#[test]
fn test_row_failures_are_diagnostics() {
    let long_name = "가".repeat(MAX_CELL_TEXT_LEN + 1);
    let csv = format!(
        "상품명,수량,단가\n사과,1,100\n{},2,100\n배,3,100\n",
        long_name
    );

    let doc = ConversionOrchestrator::default()
        .convert_file_at(
            csv.as_bytes(),
            "csv",
            None,
            &MappingRules::new(),
            &FixedValues::new(),
            fixed_now(),
        )
        .unwrap();

    assert_eq!(doc.total_rows, 3);
    assert_eq!(doc.processed_rows, 2);
    assert_eq!(doc.errors.len(), 1);
    assert_eq!(doc.errors[0].row, 2);
    assert_eq!(doc.processed_rows + doc.errors.len(), doc.total_rows);

    let (_, range) = read_first_sheet(&doc.content).unwrap();
    // 失败行留空,合计行位于 data_start + 3
    assert_eq!(cell_text(&range, 3, 0), "");
    assert_eq!(cell_text(&range, 4, 0), "ORD20261019-003");
    assert_eq!(cell_text(&range, 5, 2), "합계");
    assert_eq!(cell_number(&range, 5, 3), Some(4.0));
}

#[test]
fn test_templated_conversion_uses_marker_and_flattens_formulas() {
    let template = build_template();

    let doc = ConversionOrchestrator::default()
        .convert_file_at(
            ORDERS_CSV.as_bytes(),
            "csv",
            Some(&template),
            &MappingRules::new(),
            &FixedValues::new(),
            fixed_now(),
        )
        .unwrap();

    assert_eq!(doc.rendering, RenderPath::Templated);
    assert_eq!(doc.processed_rows, 2);

    let (name, range) = read_first_sheet(&doc.content).unwrap();
    assert_eq!(name, "발주양식");
    assert_eq!(cell_text(&range, 0, 0), "주식회사 예시 발주서");
    // 公式已规范化为静态值
    assert_eq!(cell_number(&range, 0, 5), Some(2.0));
    let formulas = read_first_sheet_formulas(&doc.content).unwrap();
    assert!(formulas.used_cells().all(|(_, _, f)| f.is_empty()));

    // 表头在标记行,数据从下一行开始
    assert_eq!(cell_text(&range, 3, 0), "발주번호");
    assert_eq!(cell_text(&range, 4, 0), "ORD20261019-001");
    assert_eq!(cell_text(&range, 6, 2), "합계");
    assert_eq!(cell_number(&range, 6, 5), Some(20000.0));
}

#[test]
fn test_direct_input_flow() {
    let input = DirectInput::new()
        .with("상품명", "복사용지")
        .with("수량", "2")
        .with("연락처", "010-9999-0000");
    let fixed = FixedValues::new()
        .with(CanonicalField::UnitPrice, "1500")
        .with(CanonicalField::Address, "본사");

    let doc = ConversionOrchestrator::default()
        .convert_direct_input_at(None, &input, &fixed, fixed_now())
        .unwrap();

    assert_eq!(doc.total_rows, 1);
    assert_eq!(doc.processed_rows, 1);

    let (_, range) = read_first_sheet(&doc.content).unwrap();
    assert_eq!(cell_text(&range, 2, 0), "ORD20261019-001");
    assert_eq!(cell_number(&range, 2, 5), Some(3000.0));
    assert_eq!(cell_text(&range, 2, 8), "본사");
    assert_eq!(cell_text(&range, 3, 2), "합계");
}

#[test]
fn test_output_written_to_disk_is_readable() {
    let (_dir, out_dir) = temp_out_dir().unwrap();
    let doc = ConversionOrchestrator::default()
        .convert_file(
            ORDERS_CSV.as_bytes(),
            ".CSV",
            None,
            &MappingRules::new(),
            &FixedValues::new(),
        )
        .unwrap();

    let path = out_dir.join(&doc.file_name);
    std::fs::write(&path, &doc.content).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let (_, range) = read_first_sheet(&bytes).unwrap();
    assert_eq!(cell_text(&range, 2, 2), "사과");
    assert_eq!(doc.mime_type(), purchase_order_converter::domain::XLSX_MIME_TYPE);
}
