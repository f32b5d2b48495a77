//! Display formatting shared by every view.
//!
//! All functions here are pure. The ones that depend on the current instant
//! have an `_at` variant taking it explicitly.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// `1500 -> "1.5K"`, `999_999 -> "999K"`, `2_500_000 -> "2.5M"`.
pub fn format_views(views: u64) -> String {
    if views < 1_000 {
        views.to_string()
    } else if views < 10_000 {
        format!("{}K", one_decimal(views as f64 / 1_000.0))
    } else if views < 1_000_000 {
        format!("{}K", views / 1_000)
    } else {
        format!("{}M", one_decimal(views as f64 / 1_000_000.0))
    }
}

/// One fractional digit, rounded on the exact binary value of `x` with ties
/// going up. `1.15` is stored just below itself and so gives `"1.1"`.
/// Expects a finite `x` in `[1, 2^52)`.
fn one_decimal(x: f64) -> String {
    let bits = x.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32 - 1075;
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);

    let scaled = mantissa as u128 * 10;
    let tenths = if exponent >= 0 {
        scaled << exponent.min(64)
    } else {
        let shift = (-exponent).min(127) as u32;
        let denominator = 1u128 << shift;
        let (quotient, remainder) = (scaled / denominator, scaled % denominator);
        if remainder * 2 >= denominator {
            quotient + 1
        } else {
            quotient
        }
    };
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Seconds to `"2 mins 5 secs"`, `"1 min"` or `"45 secs"`.
pub fn format_read_time(seconds: u64) -> String {
    let minutes = (seconds / 60) as i64;
    let remaining = (seconds % 60) as i64;

    if minutes > 0 && remaining > 0 {
        format!("{} min{} {} sec{}", minutes, plural(minutes), remaining, plural(remaining))
    } else if minutes > 0 {
        format!("{} min{}", minutes, plural(minutes))
    } else {
        format!("{} sec{}", remaining, plural(remaining))
    }
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    format_time_ago_at(timestamp, Utc::now())
}

/// Relative age of `timestamp` as seen from `now`. Months are 30-day blocks
/// and years 365-day blocks.
pub fn format_time_ago_at(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;
    let years = days / 365;

    if seconds < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} minute{} ago", minutes, plural(minutes))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if days < 7 {
        format!("{} day{} ago", days, plural(days))
    } else if weeks < 4 {
        format!("{} week{} ago", weeks, plural(weeks))
    } else if months < 12 {
        format!("{} month{} ago", months, plural(months))
    } else {
        format!("{} year{} ago", years, plural(years))
    }
}

/// "Today", "Yesterday", or a short "Aug 1" label for an archive date.
/// Dates that do not parse as `YYYY-MM-DD` are returned unchanged.
pub fn date_label(date: &str, today: NaiveDate) -> String {
    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_string();
    };
    if parsed == today {
        "Today".to_string()
    } else if Some(parsed) == today.checked_sub_signed(Duration::days(1)) {
        "Yesterday".to_string()
    } else {
        format!("{} {}", parsed.format("%b"), parsed.day())
    }
}

pub fn article_count_label(count: u32) -> String {
    if count == 1 {
        "1 article".to_string()
    } else {
        format!("{} articles", count)
    }
}

/// Long-form date used in the article header, e.g. "August 3, 2025".
pub fn format_generated_on(timestamp: DateTime<Utc>) -> String {
    format!("{} {}, {}", timestamp.format("%B"), timestamp.day(), timestamp.year())
}

pub fn paragraphs(content: &str) -> Vec<&str> {
    content.split("\n\n").collect()
}
