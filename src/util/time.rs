//! Duration formatting for reports

use std::time::Duration;

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use durand::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// assert_eq!(format_duration(Duration::from_secs(150)), "2m30.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else if nanos < 60_000_000_000 {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    } else {
        let minutes = duration.as_secs() / 60;
        let rest = duration - Duration::from_secs(minutes * 60);
        format!("{}m{:.2}s", minutes, rest.as_secs_f64())
    }
}

/// Signed difference `actual - target`, formatted with an explicit sign
///
/// ```
/// use std::time::Duration;
/// use durand::util::time::format_offset;
///
/// assert_eq!(format_offset(Duration::from_millis(10), Duration::from_micros(10_250)), "+250.00us");
/// assert_eq!(format_offset(Duration::from_millis(10), Duration::from_millis(9)), "-1.00ms");
/// ```
pub fn format_offset(target: Duration, actual: Duration) -> String {
    if actual >= target {
        format!("+{}", format_duration(actual - target))
    } else {
        format!("-{}", format_duration(target - actual))
    }
}

/// Signed `actual - target` in nanoseconds, saturating at the `i64` range
pub fn offset_nanos(target: Duration, actual: Duration) -> i64 {
    let diff = actual.as_nanos() as i128 - target.as_nanos() as i128;
    diff.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
