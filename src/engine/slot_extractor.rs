// ==========================================
// 课表日历导出系统 - 时段提取器
// ==========================================
// 职责: 标题 / 教师 / 描述片段 / 起止时间 / 日期 / 分组标签
// 整班判定: 合并单元格元数据优先,兄弟列空标题启发式兜底
// ==========================================

mod core;


pub use core::{SlotExtractor, SlotWindow};
