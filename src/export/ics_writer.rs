// ==========================================
// 课表日历导出系统 - 日历序列化器
// ==========================================
// 职责: MergedSession → CalendarEvent → iCalendar 文本
// 红线: 每个事件生成新的 UID,不跨事件、不跨运行复用
// 红线: 带时区信息的时刻按目标时区换算,不重新解释
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::export_config::ExportConfig;
use crate::domain::session::{CalendarEvent, MergedSession};
use crate::export::escape::{escape_text, fold_line};
use crate::export::vtimezone::vtimezone_lines;
use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;
use uuid::Uuid;

/// 描述片段分隔符
pub const FRAGMENT_SEPARATOR: &str = " | ";

/// 教师分隔符
pub const TEACHER_SEPARATOR: &str = " / ";

/// 多分组连接词
pub const GROUP_SEPARATOR: &str = " and ";

const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

// ==========================================
// CalendarSerializer
// ==========================================
#[derive(Debug, Clone)]
pub struct CalendarSerializer {
    tz: Tz,
    prod_id: String,
    include_vtimezone: bool,
    eol: &'static str,
    fold_lines: bool,
}

impl CalendarSerializer {
    pub fn new(config: &ExportConfig) -> ConfigResult<Self> {
        Ok(Self {
            tz: config.tz()?,
            prod_id: config.prod_id.clone(),
            include_vtimezone: config.include_vtimezone,
            eol: if config.crlf { "\r\n" } else { "\n" },
            fold_lines: config.fold_lines,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// 为每个课程构建一个日历事件（新 UID）
    pub fn build_events(&self, sessions: &[MergedSession]) -> Vec<CalendarEvent> {
        sessions
            .iter()
            .map(|session| CalendarEvent {
                uid: Uuid::new_v4().to_string(),
                start: self.zoned(session.start.in_zone(&self.tz)),
                end: self.zoned(session.end.in_zone(&self.tz)),
                summary: session.title.clone(),
                description: describe(session),
            })
            .collect()
    }

    /// 序列化为 iCalendar 文本（DTSTAMP 取当前 UTC 时间）
    pub fn render(&self, sessions: &[MergedSession]) -> String {
        self.render_events(&self.build_events(sessions), Utc::now())
    }

    /// 序列化已构建的事件
    pub fn render_events(&self, events: &[CalendarEvent], dtstamp: DateTime<Utc>) -> String {
        let mut lines: Vec<String> = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.prod_id),
            "CALSCALE:GREGORIAN".to_string(),
        ];

        if self.include_vtimezone {
            let years = events
                .iter()
                .flat_map(|e| [e.start.year(), e.end.year()]);
            if let (Some(first), Some(last)) = (years.clone().min(), years.max()) {
                lines.extend(vtimezone_lines(&self.tz, first, last));
            }
        }

        let stamp = dtstamp.format(UTC_FORMAT).to_string();
        let tzid = self.tz.name();
        for event in events {
            lines.push("BEGIN:VEVENT".to_string());
            lines.push(format!("UID:{}", event.uid));
            lines.push(format!("DTSTAMP:{}", stamp));
            lines.push(format!(
                "DTSTART;TZID={}:{}",
                tzid,
                event.start.format(LOCAL_FORMAT)
            ));
            lines.push(format!("DTEND;TZID={}:{}", tzid, event.end.format(LOCAL_FORMAT)));
            lines.push(format!("SUMMARY:{}", escape_text(&event.summary)));
            lines.push(format!("DESCRIPTION:{}", escape_text(&event.description)));
            lines.push("END:VEVENT".to_string());
        }
        lines.push("END:VCALENDAR".to_string());

        debug!(events = events.len(), timezone = tzid, "日历序列化完成");

        let mut out = String::new();
        for line in lines {
            if self.fold_lines {
                out.push_str(&fold_line(&line, self.eol));
            } else {
                out.push_str(&line);
            }
            out.push_str(self.eol);
        }
        out
    }

    /// 本地时间 → 目标时区时刻
    ///
    /// 夏令时跳变造成的不存在时刻顺延一小时;重复时刻取较早者
    fn zoned(&self, local: NaiveDateTime) -> DateTime<Tz> {
        self.tz
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| {
                self.tz
                    .from_local_datetime(&(local + Duration::hours(1)))
                    .earliest()
            })
            .unwrap_or_else(|| self.tz.from_utc_datetime(&local))
    }
}

/// 组装事件描述
///
/// 行顺序固定: 描述片段 → 教师 → 分组;空行省略
pub fn describe(session: &MergedSession) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !session.description_fragments.is_empty() {
        let fragments: Vec<&str> = session
            .description_fragments
            .iter()
            .map(String::as_str)
            .collect();
        lines.push(fragments.join(FRAGMENT_SEPARATOR));
    }

    if !session.teachers.is_empty() {
        let teachers: Vec<&str> = session.teachers.iter().map(String::as_str).collect();
        lines.push(format!("Teacher(s): {}", teachers.join(TEACHER_SEPARATOR)));
    }

    let groups: Vec<&str> = session.group_labels.iter().map(|g| g.as_str()).collect();
    match groups.len() {
        0 => {}
        1 => lines.push(format!("Group: {}", groups[0])),
        _ => lines.push(format!("Groups: {}", groups.join(GROUP_SEPARATOR))),
    }

    lines.join("\n")
}
