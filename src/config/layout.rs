// ==========================================
// 课表日历导出系统 - 网格布局约定
// ==========================================
// 课表结构不由表头声明,而是由固定行偏移与第 0 列标记推断。
// 所有偏移集中在此处命名,启发式规则可单独审计与测试。
// ==========================================

use serde::{Deserialize, Serialize};

/// 周标记正则（第 0 列）: "S1" / "Sem 2" / "Semaine 3"
pub const WEEK_MARKER_PATTERN: &str = r"(?i)^\s*s(?:em(?:aine)?)?\.?\s*\d+\b";

/// 时段标记正则（第 0 列）: "H1" / "H 2"
pub const SLOT_MARKER_PATTERN: &str = r"(?i)^\s*h\s*\d+\b";

/// 日期行 = 周标记行 + 1
pub const DATE_ROW_OFFSET: usize = 1;

/// 分组行 = 周标记行 + 2
pub const GROUP_ROW_OFFSET: usize = 2;

/// 教师扫描窗口起点（时段行 + 2,含）
pub const TEACHER_WINDOW_START: usize = 2;

/// 教师扫描窗口终点（时段行 + 5,不含）
pub const TEACHER_WINDOW_END: usize = 5;

/// 时间扫描最大前瞻行数
pub const TIME_LOOKAHEAD: usize = 12;

/// 前瞻内未找到时间时的截止偏移（时间通常位于时段行 + 4 / + 5）
pub const FALLBACK_STOP_OFFSET: usize = 4;

// ==========================================
// LayoutConfig - 可覆写的布局参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub week_marker_pattern: String,
    pub slot_marker_pattern: String,
    pub date_row_offset: usize,
    pub group_row_offset: usize,
    pub teacher_window_start: usize,
    pub teacher_window_end: usize,
    pub time_lookahead: usize,
    pub fallback_stop_offset: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            week_marker_pattern: WEEK_MARKER_PATTERN.to_string(),
            slot_marker_pattern: SLOT_MARKER_PATTERN.to_string(),
            date_row_offset: DATE_ROW_OFFSET,
            group_row_offset: GROUP_ROW_OFFSET,
            teacher_window_start: TEACHER_WINDOW_START,
            teacher_window_end: TEACHER_WINDOW_END,
            time_lookahead: TIME_LOOKAHEAD,
            fallback_stop_offset: FALLBACK_STOP_OFFSET,
        }
    }
}
