// ==========================================
// 课表日历导出系统 - API层错误类型
// ==========================================
// 职责: 汇总导入层与配置层错误,供调用方统一处理
// 说明: 引擎层不产生错误,零事件工作表不是错误
// ==========================================

use crate::config::error::ConfigError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 源文件错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("后台任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_message() {
        let err: ApiError = ImportError::SheetNotFound("EDT P3".to_string()).into();
        assert_eq!(err.to_string(), "文件导入失败: 工作表不存在: EDT P3");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: ApiError = ConfigError::InvalidTimezone("Mars/Olympus".to_string()).into();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidTimezone(_))));
    }
}
