// ==========================================
// 课表日历导出系统 - 引擎层
// ==========================================
// 职责: 从无表头网格推断课表结构并提取课程
// 红线: 引擎不做 I/O,畸形输入只跳过不报错
// ==========================================

pub mod cell_classifier;
pub mod grid_locator;
pub mod group_merger;
pub mod orchestrator;
pub mod slot_extractor;

// 重导出核心引擎
pub use cell_classifier::{CellClassifier, ClassifiedGrid};
pub use grid_locator::{DayAnchor, GridLocator, MarkerRows, WeekBlock};
pub use group_merger::GroupMerger;
pub use orchestrator::{ExtractionResult, TimetableOrchestrator};
pub use slot_extractor::{SlotExtractor, SlotWindow};
