// ==========================================
// 课表日历导出系统 - 网格定位器
// ==========================================
// 职责: 扫描第 0 列的周标记行 / 时段标记行,
//       并为每个时段行解析所属周块（日期行、分组行、日锚列）
// ==========================================
// 结构缺口（无所属周标记、日期行无日期）只跳过,不报错
// ==========================================

use crate::config::layout::LayoutConfig;
use crate::engine::cell_classifier::ClassifiedGrid;
use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, trace};

// ==========================================
// MarkerRows - 标记行（均升序）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerRows {
    pub week_rows: Vec<usize>,
    pub slot_rows: Vec<usize>,
}

impl MarkerRows {
    /// 所属周标记行: 不大于 slot_row 的最大周标记行
    pub fn governing_week(&self, slot_row: usize) -> Option<usize> {
        let idx = self.week_rows.partition_point(|&w| w <= slot_row);
        idx.checked_sub(1).map(|i| self.week_rows[i])
    }

    /// slot_row 之后最近的标记行（周或时段）,作为扫描上界
    pub fn next_marker_after(&self, row: usize) -> Option<usize> {
        let next_week = self.week_rows.iter().copied().find(|&w| w > row);
        let next_slot = self.slot_rows.iter().copied().find(|&s| s > row);
        match (next_week, next_slot) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

// ==========================================
// DayAnchor - 日锚列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAnchor {
    pub column: usize,
    pub date: NaiveDate,
}

// ==========================================
// WeekBlock - 时段行所属的周块
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBlock {
    pub week_row: usize,
    pub date_row: usize,
    pub group_row: usize,
    pub anchors: Vec<DayAnchor>,
}

// ==========================================
// GridLocator
// ==========================================
pub struct GridLocator {
    week_marker: Regex,
    slot_marker: Regex,
    date_row_offset: usize,
    group_row_offset: usize,
}

impl GridLocator {
    /// 由已校验的布局配置创建（正则已在配置校验中编译过）
    pub fn new(layout: &LayoutConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            week_marker: Regex::new(&layout.week_marker_pattern)?,
            slot_marker: Regex::new(&layout.slot_marker_pattern)?,
            date_row_offset: layout.date_row_offset,
            group_row_offset: layout.group_row_offset,
        })
    }

    /// 扫描第 0 列,返回升序的周标记行与时段标记行
    ///
    /// 同一行同时匹配两种标记时按周标记处理
    pub fn locate(&self, grid: &ClassifiedGrid<'_>) -> MarkerRows {
        let mut markers = MarkerRows::default();
        for row in 0..grid.height() {
            let Some(text) = grid.class(row, 0).as_text() else {
                continue;
            };
            if self.week_marker.is_match(text) {
                markers.week_rows.push(row);
            } else if self.slot_marker.is_match(text) {
                markers.slot_rows.push(row);
            }
        }
        debug!(
            weeks = markers.week_rows.len(),
            slots = markers.slot_rows.len(),
            "标记行扫描完成"
        );
        markers
    }

    /// 解析时段行所属的周块;无所属周标记时返回 None
    pub fn week_block(
        &self,
        grid: &ClassifiedGrid<'_>,
        markers: &MarkerRows,
        slot_row: usize,
    ) -> Option<WeekBlock> {
        let week_row = match markers.governing_week(slot_row) {
            Some(w) => w,
            None => {
                debug!(slot_row, "时段行无所属周标记,跳过");
                return None;
            }
        };
        let date_row = week_row + self.date_row_offset;
        let group_row = week_row + self.group_row_offset;
        Some(WeekBlock {
            week_row,
            date_row,
            group_row,
            anchors: self.day_anchors(grid, date_row),
        })
    }

    /// 日期行中所有分类为日期的列
    ///
    /// 紧邻前一日锚且日期相同的列视为其子列,不单独成锚
    pub fn day_anchors(&self, grid: &ClassifiedGrid<'_>, date_row: usize) -> Vec<DayAnchor> {
        let mut anchors: Vec<DayAnchor> = Vec::new();
        for column in 1..grid.width() {
            let Some(date) = grid.class(date_row, column).as_date() else {
                continue;
            };
            if let Some(prev) = anchors.last() {
                if prev.column + 1 == column && prev.date == date {
                    trace!(column, "重复日期列,视为子列");
                    continue;
                }
            }
            anchors.push(DayAnchor { column, date });
        }
        if anchors.is_empty() {
            debug!(date_row, "日期行无日期单元格");
        }
        anchors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{CellValue, Grid};

    fn text_grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| CellValue::text(*s)).collect())
                .collect(),
        )
    }

    fn locator() -> GridLocator {
        GridLocator::new(&LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_locate_markers() {
        let grid = text_grid(&[
            &["S1"],
            &[""],
            &[""],
            &["H1"],
            &["Semaine 2"],
            &[""],
            &["h 2"],
            &["Salle"],
        ]);
        let markers = locator().locate(&ClassifiedGrid::new(&grid));
        assert_eq!(markers.week_rows, vec![0, 4]);
        assert_eq!(markers.slot_rows, vec![3, 6]);
    }

    #[test]
    fn test_governing_week() {
        let markers = MarkerRows {
            week_rows: vec![2, 10],
            slot_rows: vec![1, 5, 12],
        };
        assert_eq!(markers.governing_week(1), None);
        assert_eq!(markers.governing_week(5), Some(2));
        assert_eq!(markers.governing_week(12), Some(10));
        assert_eq!(markers.governing_week(10), Some(10));
        assert_eq!(markers.next_marker_after(5), Some(10));
        assert_eq!(markers.next_marker_after(10), Some(12));
        assert_eq!(markers.next_marker_after(12), None);
    }

    #[test]
    fn test_week_block_and_anchors() {
        let grid = text_grid(&[
            &["S1", "", "", ""],
            &["", "", "05/01/2026", "", "06/01/2026", "06/01/2026"],
            &["", "", "G 1", "G 2"],
            &["H1"],
        ]);
        let classified = ClassifiedGrid::new(&grid);
        let locator = locator();
        let markers = locator.locate(&classified);
        let block = locator.week_block(&classified, &markers, 3).unwrap();
        assert_eq!(block.date_row, 1);
        assert_eq!(block.group_row, 2);
        let columns: Vec<usize> = block.anchors.iter().map(|a| a.column).collect();
        assert_eq!(columns, vec![2, 4]);
    }

    #[test]
    fn test_slot_without_week_has_no_block() {
        let grid = text_grid(&[&["H1"], &["S1"]]);
        let classified = ClassifiedGrid::new(&grid);
        let locator = locator();
        let markers = locator.locate(&classified);
        assert!(locator.week_block(&classified, &markers, 0).is_none());
    }
}
