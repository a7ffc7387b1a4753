//! Waterdip Utils - Formatting Helpers
//!
//! Date and number formatting shared by page view models.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use chrono::{DateTime, Datelike, Utc};

// =============================================================================
// Date Formatting
// =============================================================================

/// Format as `Mon D YYYY`, e.g. `Jan 5 2023`.
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%b %-d %Y").to_string()
}

/// Format an RFC3339 timestamp as `D Mon YYYY`, e.g. `5 Jan 2023`.
///
/// Returns an empty string when the input cannot be parsed.
pub fn formatted_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(d) => d.with_timezone(&Utc).format("%-d %b %Y").to_string(),
        Err(_) => String::new(),
    }
}

/// Compact label for the span between two dates: `2Y`, `3M`, `5d`, `4h`,
/// `30m` or `10s`. The two dates may be given in either order.
///
/// Calendar years and months take precedence, so Dec 31 → Jan 1 is `1Y`.
pub fn compute_date_range(
    first: Option<DateTime<Utc>>,
    second: Option<DateTime<Utc>>,
) -> Option<String> {
    let (first, second) = (first?, second?);
    let (from, to) = if first > second {
        (second, first)
    } else {
        (first, second)
    };

    let years = to.year() - from.year();
    if years != 0 {
        return Some(format!("{}Y", years));
    }

    let months = to.month() as i32 - from.month() as i32;
    if months > 0 {
        return Some(format!("{}M", months));
    }

    let secs = (to - from).num_seconds();
    let label = if secs >= 86_400 {
        format!("{}d", secs / 86_400)
    } else if secs >= 3_600 {
        format!("{}h", secs / 3_600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    };
    Some(label)
}

// =============================================================================
// Number Formatting
// =============================================================================

/// Render a ratio as a percentage with two decimals: `0.1234` → `12.34%`.
pub fn percentage(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Render a number with two decimals.
pub fn two_digit_float(value: f64) -> String {
    format!("{:.2}", value)
}
