//! Time helpers for the countdown.
//!
//! Pure functions only:
//! - Converting hours/minutes/seconds into a total
//! - `HH:MM:SS` formatting
//! - Progress ratio
//! - Wall-clock finish estimates

use chrono::{Local, NaiveTime, TimeDelta};

/// Finish text shown when the countdown has reached zero.
pub const NOW_TEXT: &str = "现在";

/// Finish text shown when no countdown is in progress.
pub const NO_FINISH_TEXT: &str = "-";

const SECONDS_PER_DAY: u64 = 86_400;

/// Longest duration a countdown or preset may have.
pub const MAX_SECONDS: u64 = i64::MAX as u64;

/// Converts hours, minutes and seconds into a total number of seconds.
///
/// The result is signed so that invalid input (negative fields) stays
/// representable and can be rejected by the caller. Returns `None` when the
/// total does not fit in an `i64`.
pub fn to_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Formats a number of seconds as zero-padded `HH:MM:SS`.
///
/// Negative values are clamped to zero. Hours are not wrapped at 24.
pub fn format_hms(seconds: i64) -> String {
    format_seconds(seconds.max(0).unsigned_abs())
}

/// Formats an unsigned number of seconds as zero-padded `HH:MM:SS`.
pub fn format_seconds(total: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        hours_part(total),
        minutes_part(total),
        seconds_part(total)
    )
}

/// Formats a [`std::time::Duration`] as `HH:MM:SS`, dropping sub-second precision.
pub fn format_duration(duration: std::time::Duration) -> String {
    format_seconds(duration.as_secs())
}

/// Returns the consumed fraction of a countdown in `[0, 1]`.
///
/// Returns 0 when `initial_seconds` is 0.
pub fn progress(remaining_seconds: u64, initial_seconds: u64) -> f64 {
    if initial_seconds == 0 {
        return 0.0;
    }
    let consumed = initial_seconds.saturating_sub(remaining_seconds) as f64;
    (consumed / initial_seconds as f64).clamp(0.0, 1.0)
}

/// Whole hours contained in `seconds`.
pub fn hours_part(seconds: u64) -> u64 {
    seconds / 3600
}

/// Minutes left over after removing whole hours.
pub fn minutes_part(seconds: u64) -> u64 {
    (seconds % 3600) / 60
}

/// Seconds left over after removing whole minutes.
pub fn seconds_part(seconds: u64) -> u64 {
    seconds % 60
}

/// Estimates the wall-clock time at which a countdown with `remaining_seconds`
/// left will finish, using the local clock.
pub fn estimate_finish_text(remaining_seconds: u64) -> String {
    estimate_finish_text_from(Local::now().time(), remaining_seconds)
}

/// Same as [`estimate_finish_text`] but with an explicit "now".
///
/// The result wraps past midnight.
pub fn estimate_finish_text_from(now: NaiveTime, remaining_seconds: u64) -> String {
    if remaining_seconds == 0 {
        return NOW_TEXT.to_string();
    }
    // Only the time of day is shown, so whole days can be dropped.
    let within_day = (remaining_seconds % SECONDS_PER_DAY) as i64;
    let (finish, _) = now.overflowing_add_signed(TimeDelta::seconds(within_day));
    finish.format("%H:%M:%S").to_string()
}

// ============================================================================
// Tests
// ============================================================================
