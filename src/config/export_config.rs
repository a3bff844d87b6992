// ==========================================
// 课表日历导出系统 - 导出配置
// ==========================================
// 职责: 配置加载（JSON）、默认值、校验
// 红线: 配置按调用显式传入,不读取进程级全局状态
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::layout::LayoutConfig;
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// 默认目标时区
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// 默认 PRODID
pub const DEFAULT_PROD_ID: &str = "-//EDT Export//FR";

// ==========================================
// ExportConfig - 导出配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// IANA 时区标识
    pub timezone: String,
    pub prod_id: String,
    pub include_vtimezone: bool,
    /// true: CRLF 行尾（RFC 5545）; false: LF
    pub crlf: bool,
    /// 按 75 字节折行
    pub fold_lines: bool,
    /// 待导出的工作表;为空表示全部
    pub sheets: Vec<String>,
    pub layout: LayoutConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            prod_id: DEFAULT_PROD_ID.to_string(),
            include_vtimezone: true,
            crlf: true,
            fold_lines: true,
            sheets: Vec::new(),
            layout: LayoutConfig::default(),
        }
    }
}

impl ExportConfig {
    /// 从 JSON 文件加载配置（缺失字段取默认值）并校验
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config: ExportConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(path = %path.display(), timezone = %config.timezone, "配置加载完成");
        Ok(config)
    }

    /// 解析目标时区
    pub fn tz(&self) -> ConfigResult<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// 校验配置有效性
    ///
    /// # 校验规则
    /// 1. 时区必须为合法 IANA 标识
    /// 2. 标记正则必须可编译
    /// 3. 教师窗口起点 < 终点,且起点 > 0（时段行本身为标题）
    /// 4. 时间前瞻 > 0
    pub fn validate(&self) -> ConfigResult<()> {
        self.tz()?;

        for pattern in [
            &self.layout.week_marker_pattern,
            &self.layout.slot_marker_pattern,
        ] {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        }

        let layout = &self.layout;
        if layout.teacher_window_start == 0
            || layout.teacher_window_start >= layout.teacher_window_end
        {
            warn!(
                start = layout.teacher_window_start,
                end = layout.teacher_window_end,
                "教师窗口无效"
            );
            return Err(ConfigError::InvalidLayout(format!(
                "教师窗口 [{}, {}) 无效",
                layout.teacher_window_start, layout.teacher_window_end
            )));
        }
        if layout.time_lookahead == 0 {
            return Err(ConfigError::InvalidLayout(
                "时间前瞻行数必须大于 0".to_string(),
            ));
        }
        if layout.date_row_offset == 0 || layout.group_row_offset == 0 {
            return Err(ConfigError::InvalidLayout(
                "日期行/分组行偏移必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 工作表是否被选中
    pub fn selects_sheet(&self, name: &str) -> bool {
        self.sheets.is_empty() || self.sheets.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tz().unwrap(), chrono_tz::Europe::Paris);
        assert!(config.selects_sheet("EDT P1"));
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let config = ExportConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let mut config = ExportConfig::default();
        config.layout.teacher_window_start = 5;
        config.layout.teacher_window_end = 5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLayout(_))));

        let mut config = ExportConfig::default();
        config.layout.slot_marker_pattern = "(".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timezone": "America/Montreal", "sheets": ["EDT P1"], "layout": {{"time_lookahead": 8}}}}"#
        )
        .unwrap();

        let config = ExportConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.timezone, "America/Montreal");
        assert_eq!(config.prod_id, DEFAULT_PROD_ID);
        assert_eq!(config.layout.time_lookahead, 8);
        assert_eq!(config.layout.teacher_window_end, 5);
        assert!(config.selects_sheet("EDT P1"));
        assert!(!config.selects_sheet("EDT P2"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();
        assert!(matches!(
            ExportConfig::from_json_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
