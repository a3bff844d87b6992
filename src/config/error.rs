// ==========================================
// 课表日历导出系统 - 配置错误类型
// ==========================================

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无效时区: {0}（需 IANA 标识,如 Europe/Paris）")]
    InvalidTimezone(String),

    #[error("无效正则 {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("无效布局参数: {0}")]
    InvalidLayout(String),

    #[error("配置读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
