//! Working-day calendar.
//!
//! Leave is charged in working days. Weekends never count; public holidays are
//! tracked elsewhere and are not subtracted here.

pub mod working_days;

#[cfg(test)]
mod working_days_props;

pub use working_days::{is_working_day, working_days};
