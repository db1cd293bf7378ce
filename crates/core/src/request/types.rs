//! Leave request domain types.

use std::fmt;

use chrono::NaiveDate;
use leavewise_shared::types::{Days, EmployeeId, LeaveRequestId, LeaveTypeId, UserId};
use serde::{Deserialize, Serialize};

use crate::balance::{BalanceKey, LedgerOperation};
use crate::overlap::DateRange;

/// Leave request status.
///
/// Valid transitions:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Pending → Cancelled (cancel)
/// - Approved → Cancelled (cancel, only before the start date)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    /// Awaiting a decision; days are reserved.
    Pending,
    /// Approved; days are used.
    Approved,
    /// Rejected (terminal).
    Rejected,
    /// Cancelled (terminal).
    Cancelled,
}

impl LeaveStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the request still holds ledger days.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// History action recorded for a lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveAction {
    /// Request submitted.
    Create,
    /// Pending request approved.
    Approve,
    /// Pending request rejected.
    Reject,
    /// Pending or approved request cancelled.
    Cancel,
}

impl LeaveAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Action that moves a request into `target`.
    #[must_use]
    pub fn for_target(target: LeaveStatus) -> Self {
        match target {
            LeaveStatus::Pending => Self::Create,
            LeaveStatus::Approved => Self::Approve,
            LeaveStatus::Rejected => Self::Reject,
            LeaveStatus::Cancelled => Self::Cancel,
        }
    }
}

impl fmt::Display for LeaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a leave request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLeaveRequest {
    /// Employee taking the leave.
    pub employee_id: EmployeeId,
    /// Leave type being requested.
    pub leave_type_id: LeaveTypeId,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Free-text reason, 5 to 500 characters.
    pub reason: String,
    /// User recorded as the actor of the creation history row.
    pub submitted_by: UserId,
}

/// A creation input that passed every check except the ledger lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLeaveRequest {
    /// Employee taking the leave.
    pub employee_id: EmployeeId,
    /// Leave type being requested.
    pub leave_type_id: LeaveTypeId,
    /// Requested dates.
    pub range: DateRange,
    /// Working days in the range, frozen for the request's lifetime.
    pub days: Days,
    /// Trimmed reason.
    pub reason: String,
    /// Ledger row the request is charged to.
    pub key: BalanceKey,
    /// History actor.
    pub submitted_by: UserId,
}

impl ValidatedLeaveRequest {
    /// Ledger effect of submitting the request.
    #[must_use]
    pub fn reservation(&self) -> LedgerOperation {
        LedgerOperation::Reserve(self.days)
    }
}

/// The parts of a stored request a transition depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaveRequestSnapshot {
    /// Request id.
    pub id: LeaveRequestId,
    /// Current status.
    pub status: LeaveStatus,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Frozen day count.
    pub days: Days,
}

/// A validated transition, ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// Status before the transition.
    pub from: LeaveStatus,
    /// Status after the transition.
    pub to: LeaveStatus,
    /// History action.
    pub action: LeaveAction,
    /// Ledger effect.
    pub ledger_op: LedgerOperation,
    /// User performing the transition.
    pub actor: UserId,
    /// Set on approval.
    pub approved_by: Option<UserId>,
    /// Trimmed comment, if any.
    pub comment: Option<String>,
}
