//! Label and currency formatting for table rows, chart axes and status lines.

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use std::fmt::Display;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label produced for timestamps chrono cannot represent
pub const INVALID_LABEL: &str = "Invalid Date";

/// Format a millisecond timestamp as `YYYY-MM-DD HH:MM:SS` in local time
pub fn format_long(ts_millis: i64) -> String {
    format_long_in(ts_millis, &Local)
}

/// Format a millisecond timestamp as `YYYY-MM-DD HH:MM:SS` in the given zone
pub fn format_long_in<Tz>(ts_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::<Utc>::from_timestamp_millis(ts_millis) {
        Some(dt) => dt.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => INVALID_LABEL.to_string(),
    }
}

/// Format a millisecond timestamp as `Mon D` in local time (30-day x-axis)
pub fn format_short(ts_millis: i64) -> String {
    format_short_in(ts_millis, &Local)
}

/// Format a millisecond timestamp as `Mon D` in the given zone
pub fn format_short_in<Tz: TimeZone>(ts_millis: i64, tz: &Tz) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts_millis) {
        Some(dt) => {
            let local = dt.with_timezone(tz);
            format!("{} {}", MONTH_NAMES[local.month0() as usize], local.day())
        }
        None => INVALID_LABEL.to_string(),
    }
}

/// `YYYY-MM-DD HH:MM` in UTC, the `date` field served by `/history`
pub fn format_minute_utc(ts_millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts_millis) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => INVALID_LABEL.to_string(),
    }
}

/// Format an amount as US-locale currency: `$1,234.56`, `-$0.50`
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" reads as zero
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, fraction)
}
