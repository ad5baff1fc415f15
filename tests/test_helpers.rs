// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在内存中构造工作簿/模板夹具,读取生成的发注书
// ==========================================

#![allow(dead_code)]

use calamine::{
    open_workbook_auto_from_rs, open_workbook_from_rs, Data, Dimensions, Range, Reader, Xlsx,
};
use chrono::{DateTime, TimeZone, Utc};
use rust_xlsxwriter::{Format, Formula, Workbook};
use std::error::Error;
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

/// 固定的生成时间
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 15).unwrap()
}

/// 构造多工作表工作簿（可解析为数字的文本写成数字,空串跳过）
pub fn build_workbook(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                match value.parse::<f64>() {
                    Ok(number) => worksheet.write_number(r as u32, c as u16, number).unwrap(),
                    Err(_) => worksheet.write_string(r as u32, c as u16, *value).unwrap(),
                };
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// 典型订单表: 表头 + n 行数据
pub fn order_rows(n: usize) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "상품명".to_string(),
        "수량".to_string(),
        "단가".to_string(),
        "연락처".to_string(),
        "주소".to_string(),
    ]];
    for i in 1..=n {
        rows.push(vec![
            format!("상품{}", i),
            i.to_string(),
            "1000".to_string(),
            format!("010-0000-{:04}", i),
            "서울".to_string(),
        ]);
    }
    rows
}

/// Vec<Vec<String>> → Vec<Vec<&str>>
pub fn as_str_rows(rows: &[Vec<String>]) -> Vec<Vec<&str>> {
    rows.iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect()
}

/// 带 NO 标记与公式单元格的模板
///
/// - A1:E1: 合并标题, F1: 公式 =1+1（缓存结果 2）
/// - A4: NO → 数据从第 5 行开始
pub fn build_template() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("발주양식").unwrap();
    worksheet
        .merge_range(0, 0, 0, 4, "주식회사 예시 발주서", &Format::new().set_bold())
        .unwrap();
    worksheet
        .write_formula(0, 5, Formula::new("=1+1").set_result("2"))
        .unwrap();
    worksheet.write_string(3, 0, "NO").unwrap();
    workbook.save_to_buffer().unwrap()
}

/// 读取生成文件的第一个工作表
pub fn read_first_sheet(bytes: &[u8]) -> Result<(String, Range<Data>), Box<dyn Error>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or("no sheets")?;
    let range = workbook.worksheet_range(&name)?;
    Ok((name, range))
}

/// 读取生成文件第一个工作表的公式
pub fn read_first_sheet_formulas(bytes: &[u8]) -> Result<Range<String>, Box<dyn Error>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or("no sheets")?;
    Ok(workbook.worksheet_formula(&name)?)
}

/// 读取生成文件第一个工作表的合并区域
pub fn read_first_sheet_merges(bytes: &[u8]) -> Result<Vec<Dimensions>, Box<dyn Error>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or("no sheets")?;
    workbook.load_merged_regions()?;
    Ok(workbook
        .merged_regions_by_sheet(&name)
        .into_iter()
        .map(|(_, _, dimensions)| *dimensions)
        .collect())
}

/// 绝对坐标（0-based）单元格文本
pub fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        None | Some(Data::Empty) => String::new(),
        Some(value) => value.to_string(),
    }
}

/// 绝对坐标（0-based）单元格数值
pub fn cell_number(range: &Range<Data>, row: u32, col: u32) -> Option<f64> {
    match range.get_value((row, col))? {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        _ => None,
    }
}

/// 临时输出目录
pub fn temp_out_dir() -> Result<(TempDir, PathBuf), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().to_path_buf();
    Ok((dir, path))
}
