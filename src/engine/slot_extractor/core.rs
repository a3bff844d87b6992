// ==========================================
// 课表日历导出系统 - 时段提取器
// ==========================================
// 职责: 对每个 (时段行 × 日锚列 × 子列) 解析至多一个课程候选
// 输入: 已分类网格 + 周块 + 扫描上界
// 输出: SessionCandidate 列表
// ==========================================
// 红线: 畸形单元格不报错,只是不产出候选
// 红线: 所有向下扫描都有固定前瞻上界
// ==========================================

use crate::config::layout::LayoutConfig;
use crate::domain::session::{SessionCandidate, SessionInstant};
use crate::domain::types::{ClockTime, GroupLabel};
use crate::engine::cell_classifier::ClassifiedGrid;
use crate::engine::grid_locator::{DayAnchor, WeekBlock};
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::trace;

// ==========================================
// SlotWindow - 单个时段的扫描范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    /// 时段标记行（标题所在行）
    pub slot_row: usize,
    /// 扫描上界（不含）: min(时段行 + 1 + 前瞻, 下一标记行, 网格高度)
    pub limit: usize,
}

/// 时间对扫描结果
struct TimePair {
    start: ClockTime,
    end: ClockTime,
}

// ==========================================
// SlotExtractor
// ==========================================
pub struct SlotExtractor {
    teacher_window_start: usize,
    teacher_window_end: usize,
    time_lookahead: usize,
    fallback_stop_offset: usize,
}

impl SlotExtractor {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            teacher_window_start: layout.teacher_window_start,
            teacher_window_end: layout.teacher_window_end,
            time_lookahead: layout.time_lookahead,
            fallback_stop_offset: layout.fallback_stop_offset,
        }
    }

    /// 计算时段扫描窗口
    pub fn window(
        &self,
        grid: &ClassifiedGrid<'_>,
        slot_row: usize,
        next_marker: Option<usize>,
    ) -> SlotWindow {
        let mut limit = (slot_row + 1 + self.time_lookahead).min(grid.height());
        if let Some(next) = next_marker {
            limit = limit.min(next);
        }
        SlotWindow {
            slot_row,
            limit: limit.max(slot_row + 1),
        }
    }

    /// 提取一个时段行在周块内所有日锚上的候选
    pub fn extract(
        &self,
        grid: &ClassifiedGrid<'_>,
        block: &WeekBlock,
        window: SlotWindow,
    ) -> Vec<SessionCandidate> {
        let anchor_columns: HashSet<usize> = block.anchors.iter().map(|a| a.column).collect();
        let mut candidates = Vec::new();

        for anchor in &block.anchors {
            let primary = anchor.column;
            let sibling = primary + 1;
            // 下一列本身是日锚时,当天只有一个子列
            let has_sibling = !anchor_columns.contains(&sibling);

            let primary_label = self.group_label(grid, block.group_row, primary);
            let sibling_label = if has_sibling {
                self.group_label(grid, block.group_row, sibling)
            } else {
                None
            };

            let whole_class = has_sibling
                && self.is_whole_class(grid, window.slot_row, primary, &primary_label, &sibling_label);

            let mut labels: IndexSet<GroupLabel> = primary_label.into_iter().collect();
            if whole_class {
                trace!(row = window.slot_row, column = primary, "整班课程,合并两个分组");
                labels.extend(sibling_label.clone());
            }
            candidates.extend(self.candidate(grid, window, anchor, primary, labels));

            if has_sibling && !whole_class {
                let labels = sibling_label.into_iter().collect();
                candidates.extend(self.candidate(grid, window, anchor, sibling, labels));
            }
        }

        candidates
    }

    /// 整班判定
    ///
    /// 有合并单元格元数据时以元数据为准;否则回退到"兄弟列标题为空且两列分组不同"
    fn is_whole_class(
        &self,
        grid: &ClassifiedGrid<'_>,
        row: usize,
        primary: usize,
        primary_label: &Option<GroupLabel>,
        sibling_label: &Option<GroupLabel>,
    ) -> bool {
        match grid.merged_ranges() {
            Some(ranges) if !ranges.is_empty() => grid
                .merged_range_at(row, primary)
                .is_some_and(|m| m.contains(row, primary + 1)),
            _ => {
                grid.class(row, primary + 1).is_empty()
                    && matches!(
                        (primary_label, sibling_label),
                        (Some(a), Some(b)) if a != b
                    )
            }
        }
    }

    fn group_label(&self, grid: &ClassifiedGrid<'_>, group_row: usize, col: usize) -> Option<GroupLabel> {
        GroupLabel::normalize(&grid.display(group_row, col))
    }

    /// 解析单个子列的候选;任一字段无法解析则返回 None
    fn candidate(
        &self,
        grid: &ClassifiedGrid<'_>,
        window: SlotWindow,
        anchor: &DayAnchor,
        col: usize,
        group_labels: IndexSet<GroupLabel>,
    ) -> Option<SessionCandidate> {
        let row = window.slot_row;

        // 1. 标题
        if grid.class(row, col).is_empty() {
            return None;
        }
        let title = grid.display(row, col);

        // 2. 截止行
        let stop = self.stop_row(grid, window, col);

        // 3. 教师
        let teachers = self.teachers(grid, window, col);

        // 4. 描述片段
        let description_fragments =
            self.description_fragments(grid, row, col, stop, &title, &teachers);

        // 5. 起止时间
        let Some(times) = self.time_pair(grid, window, col) else {
            trace!(row, col, title = %title, "未找到两个不同的时间,丢弃");
            return None;
        };

        // 6. 日期 + 时间 → 起止时刻
        let start = SessionInstant {
            local: anchor.date.and_time(times.start.time),
            offset: times.start.offset,
        };
        let end = SessionInstant {
            local: anchor.date.and_time(times.end.time),
            offset: times.end.offset,
        };
        if !start.is_before(&end) {
            trace!(row, col, title = %title, "结束时间不晚于开始时间,丢弃");
            return None;
        }

        Some(SessionCandidate {
            title,
            teachers,
            description_fragments,
            start,
            end,
            group_labels,
            origin_row: row,
            origin_day_anchor: anchor.column,
            origin_column: col,
        })
    }

    /// 自时段行下一行起扫描: 首个时间为开始,其后首个不同时间为结束
    fn time_pair(&self, grid: &ClassifiedGrid<'_>, window: SlotWindow, col: usize) -> Option<TimePair> {
        let mut start: Option<ClockTime> = None;
        for r in window.slot_row + 1..window.limit {
            let Some(time) = grid.class(r, col).time_component() else {
                continue;
            };
            match start {
                None => start = Some(time),
                Some(first) if time != first => {
                    return Some(TimePair { start: first, end: time });
                }
                Some(_) => {}
            }
        }
        None
    }

    /// 截止行: 前瞻范围内首个时间行;未找到时使用固定回退偏移
    pub fn stop_row(&self, grid: &ClassifiedGrid<'_>, window: SlotWindow, col: usize) -> usize {
        (window.slot_row + 1..window.limit)
            .find(|&r| grid.class(r, col).time_component().is_some())
            .unwrap_or_else(|| (window.slot_row + self.fallback_stop_offset).min(window.limit))
    }

    /// 教师窗口: [时段行 + start, 时段行 + end),与截止行无关;时间 / 日期单元格不是文本
    fn teachers(&self, grid: &ClassifiedGrid<'_>, window: SlotWindow, col: usize) -> IndexSet<String> {
        let from = window.slot_row + self.teacher_window_start;
        let to = (window.slot_row + self.teacher_window_end).min(window.limit);
        (from..to)
            .filter_map(|r| grid.class(r, col).as_text().map(str::to_string))
            .collect()
    }

    fn description_fragments(
        &self,
        grid: &ClassifiedGrid<'_>,
        row: usize,
        col: usize,
        stop: usize,
        title: &str,
        teachers: &IndexSet<String>,
    ) -> IndexSet<String> {
        (row + 1..stop)
            .filter(|&r| {
                let class = grid.class(r, col);
                !class.is_empty() && !class.is_date()
            })
            .map(|r| grid.display(r, col))
            .filter(|text| text != title && !teachers.contains(text))
            .collect()
    }
}
