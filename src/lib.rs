// ==========================================
// 课表日历导出系统 - 核心库
// ==========================================
// 职责: 课表网格（周/时段/日期/分组布局）→ iCalendar
// 分层: importer → engine → export,由 api 编排
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 网格与课程类型
pub mod domain;

// 引擎层 - 结构推断与课程提取
pub mod engine;

// 导出层 - iCalendar 序列化
pub mod export;

// 导入层 - 表格文件
pub mod importer;

// 配置层 - 导出配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 导出接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CalendarEvent, CellClass, CellValue, ClockTime, Grid, GroupLabel, MergedRange, MergedSession,
    SessionCandidate, SessionInstant,
};

// 引擎
pub use engine::{
    CellClassifier, ClassifiedGrid, ExtractionResult, GridLocator, GroupMerger, SlotExtractor,
    TimetableOrchestrator,
};

// 导出
pub use export::{escape_text, unescape_text, CalendarSerializer};

// 配置
pub use config::{ExportConfig, LayoutConfig};

// API
pub use api::{ApiError, ApiResult, ExportApi, ExportSummary, SheetExport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "课表日历导出系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
