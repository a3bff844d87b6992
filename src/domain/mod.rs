// ==========================================
// 课表日历导出系统 - 领域模型层
// ==========================================
// 职责: 定义网格、分类结果、课程与日历事件实体
// 红线: 不含解析逻辑,不含 I/O
// ==========================================

pub mod grid;
pub mod session;
pub mod types;

// 重导出核心类型
pub use grid::{CellValue, Grid, MergedRange};
pub use session::{CalendarEvent, MergedSession, SessionCandidate, SessionInstant, SessionKey};
pub use types::{CellClass, ClockTime, GroupLabel};
