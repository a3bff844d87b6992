// ==========================================
// 课表日历导出系统 - 课表网格
// ==========================================
// 职责: 无表头矩形网格 + 可选合并单元格元数据
// 红线: 核心只读网格,不修改输入
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 单元格原始值
// ==========================================
// 与表格解码库无关的异构值,由 importer 负责转换
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s.trim()),
            // 整数值不带小数部分（Excel 中分组号常以浮点存储）
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
            CellValue::Time(t) => write!(f, "{}", t.format("%H:%M")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%d/%m/%Y %H:%M")),
        }
    }
}

// ==========================================
// MergedRange - 合并单元格区域
// ==========================================
// 行列均为 0 基,闭区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
}

impl MergedRange {
    pub fn new(row_start: usize, col_start: usize, row_end: usize, col_end: usize) -> Self {
        Self {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..=self.row_end).contains(&row)
            && (self.col_start..=self.col_end).contains(&col)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

// ==========================================
// Grid - 单个工作表的网格
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
    /// None 表示来源不提供合并信息（如 CSV）
    merged_ranges: Option<Vec<MergedRange>>,
}

impl Grid {
    /// 从行数据构建网格（短行视为右侧补空）
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            rows,
            width,
            merged_ranges: None,
        }
    }

    pub fn with_merged_ranges(mut self, ranges: Vec<MergedRange>) -> Self {
        self.merged_ranges = Some(ranges);
        self
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// 越界读取返回 Empty,扫描逻辑无需单独判断边界
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn merged_ranges(&self) -> Option<&[MergedRange]> {
        self.merged_ranges.as_deref()
    }

    /// 查找覆盖指定单元格的合并区域
    pub fn merged_range_at(&self, row: usize, col: usize) -> Option<&MergedRange> {
        self.merged_ranges
            .as_ref()?
            .iter()
            .find(|m| m.contains(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_cell_is_empty() {
        let grid = Grid::from_rows(vec![vec![CellValue::text("a")], vec![]]);
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.cell(1, 0), &CellValue::Empty);
        assert_eq!(grid.cell(9, 9), &CellValue::Empty);
    }

    #[test]
    fn test_number_display_drops_integer_fraction() {
        assert_eq!(CellValue::Number(2.0).to_string(), "2");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert!(CellValue::Number(f64::NAN).is_empty());
        assert!(CellValue::text("   ").is_empty());
    }

    #[test]
    fn test_merged_range_lookup() {
        let grid = Grid::from_rows(vec![vec![CellValue::Empty; 4]; 4])
            .with_merged_ranges(vec![MergedRange::new(1, 2, 1, 3)]);
        assert!(grid.merged_range_at(1, 3).is_some());
        assert!(grid.merged_range_at(0, 2).is_none());
        assert!(Grid::default().merged_ranges().is_none());
    }
}
