// ==========================================
// 课表日历导出系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 输出: 每个工作表一个无表头 Grid,行列为工作表绝对坐标（0 基）
// ==========================================

use crate::domain::grid::{CellValue, Grid, MergedRange};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser_trait::{FileParser, SheetGrid};
use calamine::{open_workbook, open_workbook_auto, Data, ExcelDateTime, Range, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

const SECONDS_PER_DAY: u32 = 86_400;

// 检查文件存在并返回小写扩展名
fn checked_extension(path: &Path) -> ImportResult<String> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase())
}

// 校验指定工作表均存在
fn check_selection(available: &[String], selected: &[String]) -> ImportResult<()> {
    match selected.iter().find(|name| !available.contains(name)) {
        Some(missing) => Err(ImportError::SheetNotFound(missing.clone())),
        None => Ok(()),
    }
}

fn is_selected(name: &str, selected: &[String]) -> bool {
    selected.is_empty() || selected.iter().any(|s| s == name)
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 单个工作表,名称取文件名（不含扩展名）;无合并信息
pub struct CsvParser;

impl CsvParser {
    fn sheet_name(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Sheet1".to_string())
    }
}

impl FileParser for CsvParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        let ext = checked_extension(file_path)?;
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        Ok(vec![Self::sheet_name(file_path)])
    }

    fn parse_sheets(&self, file_path: &Path, sheets: &[String]) -> ImportResult<Vec<SheetGrid>> {
        let available = self.sheet_names(file_path)?;
        check_selection(&available, sheets)?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 课表没有表头行
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::text(value)
                    }
                })
                .collect();
            rows.push(row);
        }

        debug!(file = %file_path.display(), rows = rows.len(), "CSV 解析完成");

        Ok(available
            .into_iter()
            .map(|name| SheetGrid {
                name,
                grid: Grid::from_rows(rows.clone()),
            })
            .collect())
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// .xlsx/.xlsm 读取合并单元格;.xls/.ods 不提供合并信息
pub struct ExcelParser;

impl ExcelParser {
    fn parse_xlsx(&self, path: &Path, sheets: &[String]) -> ImportResult<Vec<SheetGrid>> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let names = workbook.sheet_names().to_vec();
        if names.is_empty() {
            return Err(ImportError::EmptyWorkbook(path.display().to_string()));
        }
        check_selection(&names, sheets)?;

        let merges_loaded = match workbook.load_merged_regions() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "合并单元格读取失败,改用启发式判断");
                false
            }
        };

        let mut result = Vec::new();
        for name in names.into_iter().filter(|n| is_selected(n, sheets)) {
            let merged = merges_loaded.then(|| {
                workbook
                    .merged_regions_by_sheet(&name)
                    .into_iter()
                    .map(|(_, _, dims)| {
                        MergedRange::new(
                            dims.start.0 as usize,
                            dims.start.1 as usize,
                            dims.end.0 as usize,
                            dims.end.1 as usize,
                        )
                    })
                    .collect::<Vec<_>>()
            });
            let range = workbook.worksheet_range(&name)?;
            let mut grid = range_to_grid(&range);
            if let Some(ranges) = merged {
                grid = grid.with_merged_ranges(ranges);
            }
            result.push(SheetGrid { name, grid });
        }
        Ok(result)
    }

    fn parse_auto(&self, path: &Path, sheets: &[String]) -> ImportResult<Vec<SheetGrid>> {
        let mut workbook = open_workbook_auto(path)?;
        let names = workbook.sheet_names().to_vec();
        if names.is_empty() {
            return Err(ImportError::EmptyWorkbook(path.display().to_string()));
        }
        check_selection(&names, sheets)?;

        let mut result = Vec::new();
        for name in names.into_iter().filter(|n| is_selected(n, sheets)) {
            let range = workbook.worksheet_range(&name)?;
            result.push(SheetGrid {
                name,
                grid: range_to_grid(&range),
            });
        }
        Ok(result)
    }
}

impl FileParser for ExcelParser {
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        let ext = checked_extension(file_path)?;
        if !matches!(ext.as_str(), "xlsx" | "xlsm" | "xls" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        let workbook = open_workbook_auto(file_path)?;
        Ok(workbook.sheet_names().to_vec())
    }

    fn parse_sheets(&self, file_path: &Path, sheets: &[String]) -> ImportResult<Vec<SheetGrid>> {
        let ext = checked_extension(file_path)?;
        let parsed = match ext.as_str() {
            "xlsx" | "xlsm" => self.parse_xlsx(file_path, sheets)?,
            "xls" | "ods" => self.parse_auto(file_path, sheets)?,
            _ => return Err(ImportError::UnsupportedFormat(ext)),
        };
        debug!(file = %file_path.display(), sheets = parsed.len(), "Excel 解析完成");
        Ok(parsed)
    }
}

/// calamine Range → Grid
///
/// Range 只覆盖已用区域,按起始坐标补齐左上角空白,保证与合并区域坐标一致
fn range_to_grid(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut row = vec![CellValue::Empty; start_col];
        row.extend(data_row.iter().map(convert_cell));
        rows.push(row);
    }
    Grid::from_rows(rows)
}

/// calamine Data → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => convert_excel_datetime(dt),
        Data::DateTimeIso(s) => parse_iso(s),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// calamine 日期时间单元格 → 日期 / 时间 / 日期时间
///
/// 换算交给 calamine（区分 1900 / 1904 日期系统）;小于 1 天的值只有时间部分
fn convert_excel_datetime(dt: &ExcelDateTime) -> CellValue {
    let serial = dt.as_f64();
    if dt.is_duration() {
        return dt
            .as_duration()
            .and_then(|d| u32::try_from((d + Duration::milliseconds(500)).num_seconds()).ok())
            .filter(|secs| *secs < SECONDS_PER_DAY)
            .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
            .map_or(CellValue::Number(serial), CellValue::Time);
    }

    let Some(value) = dt.as_datetime().map(whole_seconds) else {
        return CellValue::Number(serial);
    };
    if serial < 1.0 {
        return CellValue::Time(value.time());
    }
    if value.time() == NaiveTime::MIN {
        CellValue::Date(value.date())
    } else {
        CellValue::DateTime(value)
    }
}

// 序列值是浮点数,"08:00" 可能被换算为 07:59:59.999
fn whole_seconds(value: NaiveDateTime) -> NaiveDateTime {
    let rounded = value + Duration::milliseconds(500);
    rounded.with_nanosecond(0).unwrap_or(rounded)
}

fn parse_iso(s: &str) -> CellValue {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        if dt.time() == NaiveTime::MIN {
            return CellValue::Date(dt.date());
        }
        return CellValue::DateTime(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return CellValue::Date(d);
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S%.f") {
        return CellValue::Time(t);
    }
    CellValue::Text(s.to_string())
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    fn parser_for(path: &Path) -> ImportResult<Box<dyn FileParser>> {
        let ext = checked_extension(path)?;
        match ext.as_str() {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Box::new(ExcelParser)),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    pub fn sheet_names<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<String>> {
        let path = file_path.as_ref();
        Self::parser_for(path)?.sheet_names(path)
    }

    pub fn parse<P: AsRef<Path>>(
        &self,
        file_path: P,
        sheets: &[String],
    ) -> ImportResult<Vec<SheetGrid>> {
        let path = file_path.as_ref();
        Self::parser_for(path)?.parse_sheets(path, sheets)
    }
}
