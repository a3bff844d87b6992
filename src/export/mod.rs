// ==========================================
// 课表日历导出系统 - 导出层
// ==========================================
// 职责: 融合后的课程 → iCalendar 文本
// 包含: 文本转义 / 折行 / VTIMEZONE / 事件序列化
// ==========================================

pub mod escape;
pub mod ics_writer;
pub mod vtimezone;

pub use escape::{escape_text, fold_line, unescape_text};
pub use ics_writer::{describe, CalendarSerializer};
