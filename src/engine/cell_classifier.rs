// ==========================================
// 课表日历导出系统 - 单元格分类器
// ==========================================
// 职责: CellValue → {Empty, Date, Time, Text}
// 红线: 纯函数,对任意单元格值全定义、确定性
// ==========================================
// 文本判定顺序: 钟点时间 → 日期（日在前,宽松匹配） → 文本
// 时间优先,避免 "8:00" 被宽松日期规则吞掉
// ==========================================

use crate::domain::grid::{CellValue, Grid, MergedRange};
use crate::domain::types::{CellClass, ClockTime};
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

// H:MM / HhMM / 8:00:00 / 8:00 PM / 08:00Z / 08:00+01:00
// 分钟必填: "3h" 这类时长写法不是钟点
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\d{1,2})\s*(?::\s*(\d{2})|h\s*(\d{2}))(?::(\d{2}))?\s*(?:([ap])\.?\s*m\.?)?\s*(z|utc|[+-]\d{2}:?\d{2})?$",
    )
    .expect("时间正则无效")
});

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("日期正则无效"));

static DAY_FIRST_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s*[/.\-]\s*(\d{1,2})\s*[/.\-]\s*(\d{4}|\d{2})\b").expect("日期正则无效")
});

static DAY_MONTH_NAME_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:er|st|nd|rd|th)?\s+(\p{L}+)\.?,?\s+(\d{4})\b")
        .expect("日期正则无效")
});

pub struct CellClassifier;

impl CellClassifier {
    /// 单元格分类
    pub fn classify(cell: &CellValue) -> CellClass {
        match cell {
            CellValue::Empty => CellClass::Empty,
            CellValue::Number(n) if n.is_nan() => CellClass::Empty,
            CellValue::Date(date) => CellClass::Date {
                date: *date,
                time: None,
            },
            CellValue::Time(time) => CellClass::Time(ClockTime::local(*time)),
            CellValue::DateTime(dt) => {
                let time = dt.time();
                CellClass::Date {
                    date: dt.date(),
                    time: (time != NaiveTime::MIN).then_some(time),
                }
            }
            CellValue::Text(s) => Self::classify_text(s),
            other => CellClass::Text(other.to_string()),
        }
    }

    /// 文本单元格分类
    pub fn classify_text(raw: &str) -> CellClass {
        let text = raw.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("nan") {
            return CellClass::Empty;
        }
        if let Some(time) = parse_clock_time(text) {
            return CellClass::Time(time);
        }
        if let Some(date) = parse_day_first_date(text) {
            return CellClass::Date { date, time: None };
        }
        CellClass::Text(text.to_string())
    }
}

// ==========================================
// ClassifiedGrid - 已分类网格
// ==========================================
// 每个单元格只分类一次,定位器与提取器共用
pub struct ClassifiedGrid<'a> {
    grid: &'a Grid,
    classes: Vec<Vec<CellClass>>,
}

static EMPTY_CLASS: CellClass = CellClass::Empty;

impl<'a> ClassifiedGrid<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        let classes = (0..grid.height())
            .map(|row| {
                (0..grid.width())
                    .map(|col| CellClassifier::classify(grid.cell(row, col)))
                    .collect()
            })
            .collect();
        Self { grid, classes }
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// 越界返回 Empty
    pub fn class(&self, row: usize, col: usize) -> &CellClass {
        self.classes
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CLASS)
    }

    /// 原始单元格的显示文本（去首尾空白）
    pub fn display(&self, row: usize, col: usize) -> String {
        match self.class(row, col) {
            CellClass::Empty => String::new(),
            CellClass::Text(s) => s.clone(),
            _ => self.grid.cell(row, col).to_string().trim().to_string(),
        }
    }

    pub fn merged_ranges(&self) -> Option<&[MergedRange]> {
        self.grid.merged_ranges()
    }

    pub fn merged_range_at(&self, row: usize, col: usize) -> Option<&MergedRange> {
        self.grid.merged_range_at(row, col)
    }
}

// ==========================================
// 钟点时间解析
// ==========================================

fn parse_clock_time(text: &str) -> Option<ClockTime> {
    let caps = CLOCK_TIME.captures(text)?;
    let minute: u32 = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map_or(Some(0), |m| m.as_str().parse().ok())?;
    let second: u32 = caps.get(4).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let hour = to_24h(caps[1].parse().ok()?, caps.get(5).map(|m| m.as_str()))?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    let offset = match caps.get(6) {
        Some(m) => Some(parse_offset(m.as_str())?),
        None => None,
    };
    Some(ClockTime { time, offset })
}

fn to_24h(hour: u32, meridiem: Option<&str>) -> Option<u32> {
    match meridiem.map(|m| m.to_ascii_lowercase()) {
        None if hour < 24 => Some(hour),
        Some(m) if (1..=12).contains(&hour) => Some(match (m.as_str(), hour) {
            ("a", 12) => 0,
            ("a", h) => h,
            ("p", 12) => 12,
            (_, h) => h + 12,
        }),
        _ => None,
    }
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    let sign = if raw.starts_with('-') { -1 } else { 1 };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// ==========================================
// 日期解析（日在前,允许前后附带文字）
// ==========================================

fn parse_day_first_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = ISO_DATE.captures(text) {
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
        if date.is_some() {
            return date;
        }
    }

    if let Some(caps) = DAY_FIRST_DATE.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = expand_year(&caps[3])?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    DAY_MONTH_NAME_DATE.captures_iter(text).find_map(|caps| {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    Some(if raw.len() == 2 { 2000 + year } else { year })
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.as_str() {
        "janvier" | "janv" | "january" | "jan" => 1,
        "février" | "fevrier" | "févr" | "fevr" | "fév" | "fev" | "february" | "feb" => 2,
        "mars" | "march" | "mar" => 3,
        "avril" | "avr" | "april" | "apr" => 4,
        "mai" | "may" => 5,
        "juin" | "june" | "jun" => 6,
        "juillet" | "juil" | "july" | "jul" => 7,
        "août" | "aout" | "august" | "aug" => 8,
        "septembre" | "sept" | "september" | "sep" => 9,
        "octobre" | "october" | "oct" => 10,
        "novembre" | "november" | "nov" => 11,
        "décembre" | "decembre" | "déc" | "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}
