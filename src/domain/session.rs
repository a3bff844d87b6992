// ==========================================
// 课表日历导出系统 - 课程实体
// ==========================================
// SessionCandidate: 单个子列提取出的课程候选
// MergedSession:    按身份键融合后的课程
// CalendarEvent:    序列化前的日历事件
// ==========================================

use crate::domain::types::GroupLabel;
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use indexmap::IndexSet;

// ==========================================
// SessionInstant - 课程起止时刻
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionInstant {
    pub local: NaiveDateTime,
    /// 源单元格自带的时区偏移;存在时需换算而非重新解释
    pub offset: Option<FixedOffset>,
}

impl SessionInstant {
    pub fn local(local: NaiveDateTime) -> Self {
        Self {
            local,
            offset: None,
        }
    }

    /// 转换为目标时区下的本地时间
    pub fn in_zone(&self, tz: &Tz) -> NaiveDateTime {
        match self.offset {
            Some(offset) => match offset.from_local_datetime(&self.local).single() {
                Some(fixed) => fixed.with_timezone(tz).naive_local(),
                None => self.local,
            },
            None => self.local,
        }
    }

    fn comparable(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => self.local - Duration::seconds(i64::from(offset.local_minus_utc())),
            None => self.local,
        }
    }

    /// 仅当两端时区信息一致时按 UTC 比较,否则按本地时间
    pub fn is_before(&self, other: &SessionInstant) -> bool {
        if self.offset.is_some() == other.offset.is_some() {
            self.comparable() < other.comparable()
        } else {
            self.local < other.local
        }
    }
}

// ==========================================
// SessionCandidate - 课程候选
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCandidate {
    pub title: String,
    pub teachers: IndexSet<String>,
    pub description_fragments: IndexSet<String>,
    pub start: SessionInstant,
    pub end: SessionInstant,
    pub group_labels: IndexSet<GroupLabel>,
    pub origin_row: usize,
    pub origin_day_anchor: usize,
    pub origin_column: usize,
}

/// 融合身份键: (标题, 开始, 结束, 时段行, 日锚列)
pub type SessionKey = (String, SessionInstant, SessionInstant, usize, usize);

impl SessionCandidate {
    pub fn key(&self) -> SessionKey {
        (
            self.title.clone(),
            self.start,
            self.end,
            self.origin_row,
            self.origin_day_anchor,
        )
    }
}

// ==========================================
// MergedSession - 融合后的课程
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSession {
    pub title: String,
    pub teachers: IndexSet<String>,
    pub description_fragments: IndexSet<String>,
    pub start: SessionInstant,
    pub end: SessionInstant,
    pub group_labels: IndexSet<GroupLabel>,
    pub origin_row: usize,
    pub origin_day_anchor: usize,
    /// 参与融合的子列（按首次出现顺序）
    pub origin_columns: Vec<usize>,
}

impl From<SessionCandidate> for MergedSession {
    fn from(c: SessionCandidate) -> Self {
        Self {
            title: c.title,
            teachers: c.teachers,
            description_fragments: c.description_fragments,
            start: c.start,
            end: c.end,
            group_labels: c.group_labels,
            origin_row: c.origin_row,
            origin_day_anchor: c.origin_day_anchor,
            origin_columns: vec![c.origin_column],
        }
    }
}

// ==========================================
// CalendarEvent - 日历事件
// ==========================================
// 由 CalendarSerializer 独占创建,不回指网格
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub summary: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_zoned_instant_is_converted() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let instant = SessionInstant {
            local: at(7, 0),
            offset: Some(utc),
        };
        // 1 月巴黎为 UTC+1
        assert_eq!(instant.in_zone(&chrono_tz::Europe::Paris), at(8, 0));
        assert_eq!(
            SessionInstant::local(at(7, 0)).in_zone(&chrono_tz::Europe::Paris),
            at(7, 0)
        );
    }

    #[test]
    fn test_instant_ordering() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let a = SessionInstant {
            local: at(9, 0),
            offset: Some(plus_two),
        };
        let b = SessionInstant {
            local: at(8, 0),
            offset: Some(FixedOffset::east_opt(0).unwrap()),
        };
        assert!(a.is_before(&b));
        assert!(SessionInstant::local(at(8, 0)).is_before(&SessionInstant::local(at(10, 0))));
    }
}
