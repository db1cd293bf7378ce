//! Date-range intersection and the overlap policy.
//!
//! Overlap detection is read-only. Whether a detected overlap blocks a new
//! request is decided by [`OverlapPolicy`].

use chrono::NaiveDate;
use leavewise_shared::types::{Days, LeaveRequestId};
use serde::{Deserialize, Serialize};

use crate::calendar::working_days;
use crate::error::LeaveError;
use crate::request::types::LeaveStatus;

#[cfg(test)]
mod props;

/// Inclusive calendar date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, failing with `InvalidRange` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LeaveError> {
        if start > end {
            return Err(LeaveError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// True if the two ranges share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// True if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Weekdays in the range.
    pub fn working_days(&self) -> Result<Days, LeaveError> {
        working_days(self.start, self.end)
    }
}

/// What to do when a new request overlaps active ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Detect and report, but let the request through.
    #[default]
    Allow,
    /// Fail creation with `OverlappingRequests`.
    Reject,
}

impl OverlapPolicy {
    /// Applies the policy to the ids returned by [`find_overlaps`].
    pub fn enforce(self, overlapping: &[LeaveRequestId]) -> Result<(), LeaveError> {
        match self {
            Self::Reject if !overlapping.is_empty() => {
                Err(LeaveError::OverlappingRequests(overlapping.to_vec()))
            }
            _ => Ok(()),
        }
    }
}

/// An existing request of the same employee, as seen by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingLeave {
    /// Request id.
    pub id: LeaveRequestId,
    /// Requested dates.
    pub range: DateRange,
    /// Current status.
    pub status: LeaveStatus,
}

/// Returns the ids of active requests whose dates intersect `candidate`.
///
/// Rejected and cancelled requests never count.
pub fn find_overlaps<'a, I>(candidate: &DateRange, existing: I) -> Vec<LeaveRequestId>
where
    I: IntoIterator<Item = &'a ExistingLeave>,
{
    existing
        .into_iter()
        .filter(|leave| leave.status.is_active() && leave.range.overlaps(candidate))
        .map(|leave| leave.id)
        .collect()
}
