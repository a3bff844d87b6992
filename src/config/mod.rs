// ==========================================
// 课表日历导出系统 - 配置层
// ==========================================
// 职责: 时区、输出格式、工作表选择、网格布局约定
// 存储: JSON 文件（可选）,否则使用默认值
// ==========================================

pub mod error;
pub mod export_config;
pub mod layout;

// 重导出核心配置类型
pub use error::{ConfigError, ConfigResult};
pub use export_config::{ExportConfig, DEFAULT_PROD_ID, DEFAULT_TIMEZONE};
pub use layout::LayoutConfig;
