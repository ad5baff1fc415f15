// ==========================================
// 导入层集成测试（Excel 路径）
// ==========================================
// 测试目标: 选表 / 表头识别 / 数据行提取 / 预览校验
// ==========================================

mod test_helpers;

use purchase_order_converter::config::DetectionConfig;
use purchase_order_converter::engine::ConversionOrchestrator;
use purchase_order_converter::importer::{
    ExcelParser, FileParser, ImportError, UniversalFileParser,
};
use test_helpers::*;

fn summary_rows() -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "구분".to_string(),
        "합계".to_string(),
        "비율".to_string(),
        "비고".to_string(),
        "기타".to_string(),
    ]];
    for i in 1..30 {
        rows.push(vec![
            format!("항목{}", i),
            (i * 100).to_string(),
            "0.5".to_string(),
            "-".to_string(),
            "-".to_string(),
        ]);
    }
    rows
}

#[test]
fn test_orders_sheet_beats_summary_in_either_order() {
    let orders = order_rows(29);
    let summary = summary_rows();
    let parser = UniversalFileParser::default();

    for sheets in [
        vec![
            ("Summary", as_str_rows(&summary)),
            ("Orders", as_str_rows(&orders)),
        ],
        vec![
            ("Orders", as_str_rows(&orders)),
            ("Summary", as_str_rows(&summary)),
        ],
    ] {
        let bytes = build_workbook(&sheets);
        let table = parser.parse(&bytes, "xlsx").unwrap();

        assert_eq!(table.headers, vec!["상품명", "수량", "단가", "연락처", "주소"]);
        assert_eq!(table.row_count(), 29);
        assert_eq!(table.rows[0].get("상품명"), Some("상품1"));
    }
}

#[test]
fn test_blank_rows_are_skipped() {
    let bytes = build_workbook(&[(
        "주문",
        vec![
            vec!["상품명", "수량", "단가"],
            vec!["사과", "10", "1000"],
            vec!["", "", ""],
            vec!["", "", ""],
            vec!["배", "5", "2000"],
        ],
    )]);

    let parser = ExcelParser::new(DetectionConfig::default());
    let table = parser.parse_bytes(&bytes).unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0].get("수량"), Some("10"));
    assert_eq!(table.rows[1].get("상품명"), Some("배"));
    assert_eq!(table.rows[1].line, 5);
}

#[test]
fn test_low_scoring_rows_produce_synthetic_headers() {
    let bytes = build_workbook(&[(
        "Sheet1",
        vec![
            vec!["1", "2", "3"],
            vec!["4", "5", "6"],
            vec!["7", "8", "9"],
        ],
    )]);

    let table = UniversalFileParser::default().parse(&bytes, "xlsx").unwrap();

    assert_eq!(table.headers, vec!["Column1", "Column2", "Column3"]);
    // 没有消耗表头行
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[0].get("Column1"), Some("1"));
    assert_eq!(table.rows[2].get("Column3"), Some("9"));
}

#[test]
fn test_header_found_below_title_rows() {
    let bytes = build_workbook(&[(
        "주문내역",
        vec![
            vec!["2026년 10월 주문 내역"],
            vec![],
            vec!["주문번호", "상품명", "", "수량", "연락처"],
            vec!["A-1", "사과", "메모", "3", "010-1234-5678"],
        ],
    )]);

    let table = UniversalFileParser::default().parse(&bytes, "xlsx").unwrap();

    assert_eq!(table.headers, vec!["주문번호", "상품명", "수량", "연락처"]);
    assert_eq!(table.row_count(), 1);
    // 表头跳过空列后数据仍按列位置对齐
    assert_eq!(table.rows[0].get("수량"), Some("3"));
    assert_eq!(table.rows[0].get("연락처"), Some("010-1234-5678"));
}

#[test]
fn test_corrupt_workbook_is_unreadable() {
    let result = UniversalFileParser::default().parse(b"PK\x03\x04 broken", "xlsx");
    assert!(matches!(result, Err(ImportError::UnreadableSource(_))));
}

#[test]
fn test_empty_csv_is_empty_source() {
    let result = UniversalFileParser::default().parse(b"\n\n", "csv");
    assert!(matches!(result, Err(ImportError::EmptySource)));
}

#[test]
fn test_preview_reports_quality() {
    let bytes = build_workbook(&[(
        "주문",
        vec![
            vec!["상품명", "수량", "단가", "연락처", "주소"],
            vec!["사과", "10", "1000", "010-1111-2222", "서울"],
            vec!["", "3", "500", "010-3333-4444", "부산"],
            vec!["배", "", "700", "", "대구"],
        ],
    )]);

    let preview = ConversionOrchestrator::default()
        .preview(&bytes, "xlsx", 2)
        .unwrap();

    assert_eq!(preview.total_rows, 3);
    assert_eq!(preview.rows.len(), 2);
    assert!(!preview.validation.is_valid);
    assert_eq!(preview.validation.error_rows, 1);
    assert_eq!(preview.validation.warning_rows, 1);
    assert_eq!(preview.validation.valid_rows, 2);

    let json = serde_json::to_value(&preview).unwrap();
    assert_eq!(json["totalRows"], 3);
    assert_eq!(json["validation"]["errorRows"], 1);
}
