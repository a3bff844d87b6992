// ==========================================
// 课表日历导出系统 - 领域类型定义
// ==========================================
// 单元格分类结果 / 分组标签
// ==========================================

use chrono::{FixedOffset, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单元格分类 (Cell Class)
// ==========================================
// 每个单元格只分类一次,定位与提取共用同一结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellClass {
    Empty,
    /// 日期;原生 datetime 值同时保留时间部分
    Date {
        date: NaiveDate,
        time: Option<NaiveTime>,
    },
    Time(ClockTime),
    Text(String),
}

impl CellClass {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellClass::Empty)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, CellClass::Date { .. })
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellClass::Date { date, .. } => Some(*date),
            _ => None,
        }
    }

    /// 时间分量: 纯时间单元格,或带时间部分的原生 datetime
    pub fn time_component(&self) -> Option<ClockTime> {
        match self {
            CellClass::Time(t) => Some(*t),
            CellClass::Date {
                time: Some(time), ..
            } => Some(ClockTime::local(*time)),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellClass::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// ==========================================
// 钟点时间 (Clock Time)
// ==========================================
// offset 仅在源文本显式带时区（如 "08:00Z"）时存在
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    pub time: NaiveTime,
    pub offset: Option<FixedOffset>,
}

impl ClockTime {
    pub fn local(time: NaiveTime) -> Self {
        Self { time, offset: None }
    }
}

// ==========================================
// 分组标签 (Group Label)
// ==========================================
// 规范形式: "G <数字>";无法识别的非空文本原样保留
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupLabel(String);

static GROUP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:groupe?|grp|gr|g)?\s*[-_.:#]?\s*(\d+)\s*$").expect("分组正则无效")
});

impl GroupLabel {
    /// 标准化原始分组文本;空白返回 None
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match GROUP_PATTERN.captures(trimmed) {
            Some(caps) => Some(GroupLabel(format!("G {}", &caps[1]))),
            None => Some(GroupLabel(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
