// ==========================================
// 课表日历导出系统 - VTIMEZONE 生成
// ==========================================
// 依据时区数据库中真实的 UTC 偏移切换点生成 STANDARD / DAYLIGHT 子组件,
// 覆盖事件所跨越的年份区间
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::{OffsetComponents, Tz};

/// 时区观察期（一次偏移生效）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observance {
    pub daylight: bool,
    /// 生效时刻（切换前的本地时间）
    pub onset_local: NaiveDateTime,
    pub offset_from: i32,
    pub offset_to: i32,
}

const MINUTES_PER_DAY: i64 = 24 * 60;

fn offset_at(tz: &Tz, utc: NaiveDateTime) -> (i32, bool) {
    let dt = tz.from_utc_datetime(&utc);
    let offset = dt.offset();
    (
        offset.fix().local_minus_utc(),
        offset.dst_offset() != Duration::zero(),
    )
}

/// 计算 [first_year, last_year] 内的观察期
///
/// 首个观察期从 first_year 年初本地零点起生效;之后每次切换一个观察期（分钟精度）
pub fn observances(tz: &Tz, first_year: i32, last_year: i32) -> Vec<Observance> {
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(first_year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
        NaiveDate::from_ymd_opt(last_year + 1, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
    ) else {
        return Vec::new();
    };

    let (mut current_offset, mut current_dst) = offset_at(tz, start);
    let mut result = vec![Observance {
        daylight: current_dst,
        onset_local: start,
        offset_from: current_offset,
        offset_to: current_offset,
    }];

    let mut day = start;
    while day < end {
        let next_day = day + Duration::days(1);
        let (next_offset, next_dst) = offset_at(tz, next_day);
        if (next_offset, next_dst) != (current_offset, current_dst) {
            // 在 (day, next_day] 内按分钟二分定位切换点
            let (mut lo, mut hi) = (0_i64, MINUTES_PER_DAY);
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if offset_at(tz, day + Duration::minutes(mid)) == (current_offset, current_dst) {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let switch_utc = day + Duration::minutes(hi);
            result.push(Observance {
                daylight: next_dst,
                onset_local: switch_utc + Duration::seconds(i64::from(current_offset)),
                offset_from: current_offset,
                offset_to: next_offset,
            });
            current_offset = next_offset;
            current_dst = next_dst;
        }
        day = next_day;
    }

    result
}

/// 偏移格式: ±HHMM
pub fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.abs();
    format!("{}{:02}{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

/// 生成 VTIMEZONE 内容行（未折行、不含行尾）
pub fn vtimezone_lines(tz: &Tz, first_year: i32, last_year: i32) -> Vec<String> {
    let mut lines = vec![
        "BEGIN:VTIMEZONE".to_string(),
        format!("TZID:{}", tz.name()),
        format!("X-LIC-LOCATION:{}", tz.name()),
    ];
    for obs in observances(tz, first_year, last_year) {
        let kind = if obs.daylight { "DAYLIGHT" } else { "STANDARD" };
        lines.push(format!("BEGIN:{}", kind));
        lines.push(format!("DTSTART:{}", obs.onset_local.format("%Y%m%dT%H%M%S")));
        lines.push(format!("TZOFFSETFROM:{}", format_offset(obs.offset_from)));
        lines.push(format!("TZOFFSETTO:{}", format_offset(obs.offset_to)));
        lines.push(format!("END:{}", kind));
    }
    lines.push("END:VTIMEZONE".to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris_2026_transitions() {
        let obs = observances(&chrono_tz::Europe::Paris, 2026, 2026);
        assert_eq!(obs.len(), 3);

        assert!(!obs[0].daylight);
        assert_eq!(obs[0].offset_to, 3600);
        // 1 月 1 日 00:00 至 01:00（本地）的事件也落在首个观察期内
        assert_eq!(
            obs[0].onset_local,
            NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );

        // 2026-03-29 01:00 UTC → 本地 02:00 切换到夏令时
        assert!(obs[1].daylight);
        assert_eq!(
            obs[1].onset_local,
            NaiveDate::from_ymd_opt(2026, 3, 29)
                .unwrap()
                .and_hms_opt(2, 0, 0)
                .unwrap()
        );
        assert_eq!((obs[1].offset_from, obs[1].offset_to), (3600, 7200));

        // 2026-10-25 01:00 UTC → 本地 03:00 切回标准时
        assert!(!obs[2].daylight);
        assert_eq!(
            obs[2].onset_local,
            NaiveDate::from_ymd_opt(2026, 10, 25)
                .unwrap()
                .and_hms_opt(3, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_zone_without_dst_has_single_observance() {
        let obs = observances(&chrono_tz::Asia::Tokyo, 2026, 2027);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].offset_to, 9 * 3600);
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(3600), "+0100");
        assert_eq!(format_offset(-5 * 3600 - 1800), "-0530");
        assert_eq!(format_offset(0), "+0000");
    }

    #[test]
    fn test_vtimezone_block_shape() {
        let lines = vtimezone_lines(&chrono_tz::Europe::Paris, 2026, 2026);
        assert_eq!(lines.first().map(String::as_str), Some("BEGIN:VTIMEZONE"));
        assert_eq!(lines.last().map(String::as_str), Some("END:VTIMEZONE"));
        assert!(lines.contains(&"TZID:Europe/Paris".to_string()));
        assert!(lines.contains(&"BEGIN:DAYLIGHT".to_string()));
        assert!(lines.contains(&"TZOFFSETTO:+0200".to_string()));
        assert!(lines.contains(&"DTSTART:20260101T000000".to_string()));
    }
}
