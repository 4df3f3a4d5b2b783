// ==========================================
// 光纤线缆验证系统 - 表格读取器实现
// ==========================================
// 职责: 文件 → RawGrid（首个工作表,不解释表头,保留单元格类型）
// 支持: Excel (.xlsx/.xls/.xlsm) / CSV (.csv)
// ==========================================

use crate::domain::cell::{CellValue, RawGrid};
use crate::engine::timestamp::serial_to_datetime;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// GridSource Trait
// ==========================================
// 用途: 表格获取接口（引擎只依赖此接口）
// 实现者: WorkbookReader; 测试中可用内存实现替代
pub trait GridSource {
    /// 读取文件为原始表格
    ///
    /// # 返回
    /// - Ok(RawGrid): 行 × 列的原始单元格
    /// - Err: 文件不存在、格式不支持、解析失败
    fn read_grid(&self, path: &Path) -> ImportResult<RawGrid>;
}

// ==========================================
// WorkbookReader 实现
// ==========================================
pub struct WorkbookReader;

impl GridSource for WorkbookReader {
    fn read_grid(&self, path: &Path) -> ImportResult<RawGrid> {
        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" => read_excel(path),
            "csv" => read_csv(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

fn read_excel(path: &Path) -> ImportResult<RawGrid> {
    let mut workbook = open_workbook_auto(path)?;

    // 读取第一个 sheet
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;

    // Range 只覆盖已用区域,需补齐左上角的空行/空列以保持绝对行列号
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for data_row in range.rows() {
        let mut row = vec![CellValue::Empty; col_offset];
        row.extend(data_row.iter().map(convert_excel_cell));
        rows.push(row);
    }

    Ok(RawGrid::new(rows))
}

fn convert_excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::text(s.as_str())),
        Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(_) => CellValue::Empty,
    }
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn read_csv(path: &Path) -> ImportResult<RawGrid> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(convert_csv_cell).collect());
    }

    Ok(RawGrid::new(rows))
}

fn convert_csv_cell(value: &str) -> CellValue {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => CellValue::Number(n),
        _ => CellValue::Text(value.to_string()),
    }
}
