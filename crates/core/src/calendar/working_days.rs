//! Inclusive weekday counting.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use leavewise_shared::types::Days;

use crate::error::LeaveError;

/// Returns true for Monday through Friday.
#[must_use]
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts the weekdays in `[start, end]`.
///
/// Full weeks contribute five days each; only the trailing partial week is
/// walked, so the cost is constant in the length of the range.
///
/// # Errors
///
/// Returns `LeaveError::InvalidRange` if `start` is after `end`.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> Result<Days, LeaveError> {
    if start > end {
        return Err(LeaveError::InvalidRange { start, end });
    }

    let calendar_days = (end - start).num_days() + 1;
    let full_weeks = calendar_days / 7;
    let remainder = calendar_days % 7;

    let tail_start = start + Duration::days(full_weeks * 7);
    let tail = (0..remainder)
        .map(|offset| tail_start + Duration::days(offset))
        .filter(|date| is_working_day(*date))
        .count();

    // remainder < 7, so the tail count always fits
    #[allow(clippy::cast_possible_wrap)]
    let total = full_weeks * 5 + tail as i64;
    Ok(Days::whole(total))
}
