//! Adjustment domain types.

use std::fmt;

use leavewise_shared::types::{Days, LeaveBalanceId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::LedgerOperation;

/// Adjustment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentStatus {
    /// Awaiting a decision.
    Pending,
    /// Applied to the ledger.
    Approved,
    /// Declined; the ledger was never touched.
    Rejected,
}

impl AdjustmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for AdjustmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approver's decision on an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentDecision {
    /// Apply the delta.
    Approve,
    /// Decline the delta.
    Reject,
}

impl AdjustmentDecision {
    /// Status the decision leads to.
    #[must_use]
    pub const fn target(self) -> AdjustmentStatus {
        match self {
            Self::Approve => AdjustmentStatus::Approved,
            Self::Reject => AdjustmentStatus::Rejected,
        }
    }
}

/// Input for submitting an adjustment.
///
/// `delta` stays a raw decimal here so that over-precise values are
/// rejected instead of rounded.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAdjustment {
    /// Ledger row to adjust.
    pub balance_id: LeaveBalanceId,
    /// Signed change to `total_days`.
    pub delta: Decimal,
    /// Why the entitlement changes, 5 to 500 characters.
    pub reason: String,
    /// Who asked for it.
    pub requested_by: UserId,
    /// Optional remarks, at most 1000 characters.
    pub comments: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAdjustment {
    /// Ledger row to adjust.
    pub balance_id: LeaveBalanceId,
    /// Non-zero signed change.
    pub delta: Days,
    /// Trimmed reason.
    pub reason: String,
    /// Who asked for it.
    pub requested_by: UserId,
    /// Trimmed remarks.
    pub comments: Option<String>,
}

/// Result of deciding an adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustmentOutcome {
    /// The adjustment moves to a new status.
    Applied {
        /// Status after the decision.
        status: AdjustmentStatus,
        /// `Some(AdjustTotal)` when entering `approved`.
        ledger_op: Option<LedgerOperation>,
        /// Decider.
        decided_by: UserId,
        /// Trimmed decision remarks.
        comments: Option<String>,
    },
    /// Already in the requested status; nothing to write.
    Unchanged,
}
