//! 日期归一化
//!
//! 两种文法按序尝试：先绝对格式，再相对表达（"3 hours ago"）。
//! 两者都不匹配时返回哨兵值 0（未知）；日期解析失败永远不是
//! 致命错误，不向上传播。

use std::sync::OnceLock;

use chrono::{DateTime, Duration, Local, Months, NaiveDateTime, TimeZone};
use regex::Regex;

/// 绝对格式："07 January 2016 - 03:27 PM"
const ABSOLUTE_FORMAT: &str = "%d %B %Y - %I:%M %p";

static RELATIVE: OnceLock<Regex> = OnceLock::new();

fn relative_pattern() -> &'static Regex {
    RELATIVE.get_or_init(|| {
        Regex::new(r"(?i)^(\d+|an?)\s+(second|minute|hour|day|week|month|year)s?\s+ago").unwrap()
    })
}

/// 解析上传时间文本为 epoch 毫秒；无法识别时返回 0
pub fn parse_upload_date(text: &str) -> i64 {
    let text = text.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, ABSOLUTE_FORMAT) {
        if let Some(datetime) = Local.from_local_datetime(&naive).earliest() {
            return datetime.timestamp_millis();
        }
    }

    let Some(caps) = relative_pattern().captures(text) else {
        return 0;
    };

    // "a"/"an" 表示数量 1
    let amount: u32 = {
        let raw = &caps[1];
        if raw.eq_ignore_ascii_case("a") || raw.eq_ignore_ascii_case("an") {
            1
        } else {
            match raw.parse() {
                Ok(n) => n,
                Err(_) => return 0,
            }
        }
    };

    // 相对时间以解析时刻的墙钟为基准
    let now = Local::now();
    let unit = caps[2].to_ascii_lowercase();
    match subtract_unit(now, &unit, amount) {
        Some(datetime) => datetime.timestamp_millis(),
        None => 0,
    }
}

/// 静态单位表：单位名 → 日历运算
fn subtract_unit(now: DateTime<Local>, unit: &str, amount: u32) -> Option<DateTime<Local>> {
    match unit {
        "second" => Some(now - Duration::seconds(amount as i64)),
        "minute" => Some(now - Duration::minutes(amount as i64)),
        "hour" => Some(now - Duration::hours(amount as i64)),
        "day" => Some(now - Duration::days(amount as i64)),
        "week" => Some(now - Duration::weeks(amount as i64)),
        "month" => now.checked_sub_months(Months::new(amount)),
        "year" => now.checked_sub_months(Months::new(amount.checked_mul(12)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 与墙钟读取之间允许的偏差
    const TOLERANCE_MS: i64 = 2_000;

    fn assert_close(actual: i64, expected: i64) {
        assert!(
            (actual - expected).abs() < TOLERANCE_MS,
            "expected ≈{expected}, got {actual}"
        );
    }

    #[test]
    fn parses_absolute_format() {
        let parsed = parse_upload_date("07 January 2016 - 03:27 PM");
        let expected = Local
            .with_ymd_and_hms(2016, 1, 7, 15, 27, 0)
            .single()
            .unwrap()
            .timestamp_millis();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parses_relative_units() {
        let now = Local::now();
        assert_close(
            parse_upload_date("3 hours ago"),
            (now - Duration::hours(3)).timestamp_millis(),
        );
        assert_close(
            parse_upload_date("2 weeks ago"),
            (now - Duration::weeks(2)).timestamp_millis(),
        );
        assert_close(
            parse_upload_date("45 seconds ago"),
            (now - Duration::seconds(45)).timestamp_millis(),
        );
    }

    #[test]
    fn article_means_count_one() {
        let now = Local::now();
        assert_close(
            parse_upload_date("An hour ago"),
            (now - Duration::hours(1)).timestamp_millis(),
        );
        assert_close(
            parse_upload_date("a minute ago"),
            (now - Duration::minutes(1)).timestamp_millis(),
        );
        assert_close(
            parse_upload_date("A day ago"),
            (now - Duration::days(1)).timestamp_millis(),
        );
    }

    #[test]
    fn calendar_units_use_calendar_math() {
        let now = Local::now();
        assert_close(
            parse_upload_date("2 months ago"),
            now.checked_sub_months(Months::new(2))
                .unwrap()
                .timestamp_millis(),
        );
        assert_close(
            parse_upload_date("a year ago"),
            now.checked_sub_months(Months::new(12))
                .unwrap()
                .timestamp_millis(),
        );
    }

    #[test]
    fn malformed_text_degrades_to_unknown() {
        assert_eq!(parse_upload_date(""), 0);
        assert_eq!(parse_upload_date("yesterday"), 0);
        assert_eq!(parse_upload_date("3 fortnights ago"), 0);
        assert_eq!(parse_upload_date("ago"), 0);
        assert_eq!(parse_upload_date("99999999999999999999 hours ago"), 0);
    }
}
