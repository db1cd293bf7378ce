//! Error types for the leave ledger and request lifecycle.
//!
//! Every failure an operation can produce is a `LeaveError`. Callers that only
//! care about the broad category (to choose a retry or a response status) use
//! [`LeaveError::kind`].

use chrono::NaiveDate;
use leavewise_shared::types::{
    AdjustmentId, Days, DaysError, LeaveBalanceId, LeaveRequestId, LeaveTypeId,
};
use thiserror::Error;

use crate::adjustment::types::AdjustmentStatus;
use crate::balance::types::BalanceKey;
use crate::request::types::LeaveStatus;

/// Broad failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-policy input; the caller must correct it.
    ValidationFailed,
    /// A referenced entity does not exist.
    NotFound,
    /// The state machine does not allow the requested transition.
    InvalidTransition,
    /// Contention or a concurrently changed row; retry with fresh data.
    ConflictingState,
    /// The entity being created already exists.
    AlreadyExists,
    /// Storage failure unrelated to contention.
    Internal,
}

/// Errors that can occur during leave operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    // ========== Validation Errors ==========
    /// Generic input validation failure.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Start date is after end date.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// The range contains no working days.
    #[error("Date range {start} to {end} contains no working days")]
    NoWorkingDays {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Day count exceeds the leave type's per-request maximum.
    #[error("Requested {requested} days exceeds the maximum of {max} days per request")]
    ExceedsMaxDaysPerRequest {
        /// Working days in the request.
        requested: Days,
        /// Leave type maximum.
        max: u32,
    },

    /// Request was submitted with less notice than the leave type requires.
    #[error("Leave type requires {required} days notice, request gives {given}")]
    InsufficientNotice {
        /// Minimum notice in calendar days.
        required: u32,
        /// Notice actually given in calendar days.
        given: i64,
    },

    /// Request would take the remaining balance below zero.
    #[error("Requested {requested} days but only {remaining} days remain")]
    InsufficientBalance {
        /// Working days in the request.
        requested: Days,
        /// Derived remaining days before the request.
        remaining: Days,
    },

    /// Request overlaps active requests of the same employee.
    #[error("Request overlaps {} active leave request(s)", .0.len())]
    OverlappingRequests(Vec<LeaveRequestId>),

    /// Leave type name is already used in the organization.
    #[error("Leave type with name '{0}' already exists")]
    DuplicateLeaveTypeName(String),

    /// Leave type is referenced by active requests.
    #[error("Leave type {0} has active leave requests")]
    LeaveTypeInUse(LeaveTypeId),

    // ========== Not Found Errors ==========
    /// Leave type not found in the organization.
    #[error("Leave type not found: {0}")]
    LeaveTypeNotFound(LeaveTypeId),

    /// No ledger row for the key.
    #[error("Leave balance not found for {0}")]
    BalanceNotFound(BalanceKey),

    /// No ledger row with the id.
    #[error("Leave balance not found: {0}")]
    BalanceIdNotFound(LeaveBalanceId),

    /// Leave request not found.
    #[error("Leave request not found: {0}")]
    LeaveRequestNotFound(LeaveRequestId),

    /// Balance adjustment not found.
    #[error("Balance adjustment not found: {0}")]
    AdjustmentNotFound(AdjustmentId),

    // ========== State Errors ==========
    /// Leave request transition outside the lifecycle table.
    #[error("Invalid status transition from {from} to {to} (allowed: {})", format_allowed(.allowed))]
    InvalidTransition {
        /// Current status.
        from: LeaveStatus,
        /// Requested status.
        to: LeaveStatus,
        /// Targets reachable from the current status right now.
        allowed: Vec<LeaveStatus>,
    },

    /// Adjustment decision on an already decided adjustment.
    #[error("Invalid adjustment transition from {from} to {to}")]
    InvalidAdjustmentTransition {
        /// Current status.
        from: AdjustmentStatus,
        /// Requested status.
        to: AdjustmentStatus,
    },

    /// Ledger counters no longer match what the transition expects, or the
    /// storage layer aborted the transaction because of contention.
    #[error("Conflicting state: {0}")]
    ConflictingState(String),

    /// A ledger counter would leave the range its column can store.
    #[error("Leave balance for {key} would exceed the ledger limit of {limit} days")]
    LedgerCapacityExceeded {
        /// Ledger key.
        key: BalanceKey,
        /// Largest magnitude a counter can hold.
        limit: Days,
    },

    /// Ledger row already exists for the key.
    #[error("Leave balance already exists for {0}")]
    BalanceAlreadyExists(BalanceKey),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

fn format_allowed(allowed: &[LeaveStatus]) -> String {
    if allowed.is_empty() {
        return "none".to_string();
    }
    allowed
        .iter()
        .map(LeaveStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<DaysError> for LeaveError {
    fn from(err: DaysError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl LeaveError {
    /// Returns the broad failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::InvalidRange { .. }
            | Self::NoWorkingDays { .. }
            | Self::ExceedsMaxDaysPerRequest { .. }
            | Self::InsufficientNotice { .. }
            | Self::InsufficientBalance { .. }
            | Self::OverlappingRequests(_)
            | Self::DuplicateLeaveTypeName(_)
            | Self::LeaveTypeInUse(_)
            | Self::LedgerCapacityExceeded { .. } => ErrorKind::ValidationFailed,

            Self::LeaveTypeNotFound(_)
            | Self::BalanceNotFound(_)
            | Self::BalanceIdNotFound(_)
            | Self::LeaveRequestNotFound(_)
            | Self::AdjustmentNotFound(_) => ErrorKind::NotFound,

            Self::InvalidTransition { .. } | Self::InvalidAdjustmentTransition { .. } => {
                ErrorKind::InvalidTransition
            }

            Self::ConflictingState(_) => ErrorKind::ConflictingState,
            Self::BalanceAlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if the caller may retry the operation with fresh data.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::ConflictingState
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::DuplicateLeaveTypeName(_) | Self::LeaveTypeInUse(_) => 409,
            _ => match self.kind() {
                ErrorKind::ValidationFailed => 400,
                ErrorKind::NotFound => 404,
                ErrorKind::InvalidTransition
                | ErrorKind::ConflictingState
                | ErrorKind::AlreadyExists => 409,
                ErrorKind::Internal => 500,
            },
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::NoWorkingDays { .. } => "NO_WORKING_DAYS",
            Self::ExceedsMaxDaysPerRequest { .. } => "EXCEEDS_MAX_DAYS_PER_REQUEST",
            Self::InsufficientNotice { .. } => "INSUFFICIENT_NOTICE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::OverlappingRequests(_) => "OVERLAPPING_REQUESTS",
            Self::DuplicateLeaveTypeName(_) => "DUPLICATE_LEAVE_TYPE_NAME",
            Self::LeaveTypeInUse(_) => "LEAVE_TYPE_IN_USE",
            Self::LeaveTypeNotFound(_) => "LEAVE_TYPE_NOT_FOUND",
            Self::BalanceNotFound(_) | Self::BalanceIdNotFound(_) => "BALANCE_NOT_FOUND",
            Self::LeaveRequestNotFound(_) => "LEAVE_REQUEST_NOT_FOUND",
            Self::AdjustmentNotFound(_) => "ADJUSTMENT_NOT_FOUND",
            Self::InvalidTransition { .. } | Self::InvalidAdjustmentTransition { .. } => {
                "INVALID_TRANSITION"
            }
            Self::LedgerCapacityExceeded { .. } => "LEDGER_CAPACITY_EXCEEDED",
            Self::ConflictingState(_) => "CONFLICTING_STATE",
            Self::BalanceAlreadyExists(_) => "ALREADY_EXISTS",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
