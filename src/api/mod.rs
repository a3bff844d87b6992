// ==========================================
// 课表日历导出系统 - API 层
// ==========================================
// 职责: 提供导出接口,供命令行入口调用
// ==========================================

pub mod error;
pub mod export_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, ExportSummary, SheetExport};
