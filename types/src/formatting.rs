//! Number formatting for stat display.
//!
//! Used by the CLI and any UI that shows timeline values.

/// Format a stat value with K/M suffix for compact display.
///
/// - Values >= 1,000,000 are formatted as `X.XXM`
/// - Values >= 1,000 are formatted as `X.XXK`
/// - Values below 1,000 are rounded to whole numbers
///
/// # Examples
/// ```
/// use xivparse_types::formatting::format_compact;
/// assert_eq!(format_compact(500.0), "500");
/// assert_eq!(format_compact(1_500.0), "1.50K");
/// assert_eq!(format_compact(2_250_000.0), "2.25M");
/// ```
pub fn format_compact(n: f64) -> String {
    let n_abs = n.abs();
    if n_abs >= 1_000_000.0 {
        format!("{:.2}M", n / 1_000_000.0)
    } else if n_abs >= 1_000.0 {
        format!("{:.2}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}

/// Format a per-second rate with one decimal.
pub fn format_rate(n: f64) -> String {
    if n.abs() >= 10_000.0 {
        format!("{}/s", format_compact(n))
    } else {
        format!("{:.1}/s", n)
    }
}

/// Format seconds as `M:SS`.
///
/// # Examples
/// ```
/// use xivparse_types::formatting::format_duration;
/// assert_eq!(format_duration(75.4), "1:15");
/// assert_eq!(format_duration(-3.0), "0:00");
/// ```
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
