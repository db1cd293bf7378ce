//! Adjustment workflow service.

use leavewise_shared::types::{Days, UserId};
use rust_decimal::Decimal;

use crate::adjustment::types::{
    AdjustmentDecision, AdjustmentOutcome, AdjustmentStatus, NewAdjustment, ValidatedAdjustment,
};
use crate::balance::LedgerOperation;
use crate::error::LeaveError;
use crate::request::service::{MAX_REASON_LEN, MIN_REASON_LEN, validate_comment};

/// Largest absolute delta a single adjustment may carry.
pub const MAX_ABS_DELTA: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2);

/// Stateless service for balance adjustments.
pub struct AdjustmentService;

impl AdjustmentService {
    /// Validates a submission.
    ///
    /// The delta must be non-zero, have at most two decimal places and stay
    /// below [`MAX_ABS_DELTA`] in magnitude.
    pub fn validate_new(input: &NewAdjustment) -> Result<ValidatedAdjustment, LeaveError> {
        let delta = Days::new(input.delta)?;
        if delta.is_zero() {
            return Err(LeaveError::Validation(
                "Adjustment must be non-zero".to_string(),
            ));
        }
        if delta.value().abs() > MAX_ABS_DELTA {
            return Err(LeaveError::Validation(format!(
                "Adjustment must be at most {MAX_ABS_DELTA} days in magnitude"
            )));
        }

        let reason = input.reason.trim();
        let len = reason.chars().count();
        if !(MIN_REASON_LEN..=MAX_REASON_LEN).contains(&len) {
            return Err(LeaveError::Validation(format!(
                "Reason must be between {MIN_REASON_LEN} and {MAX_REASON_LEN} characters"
            )));
        }

        Ok(ValidatedAdjustment {
            balance_id: input.balance_id,
            delta,
            reason: reason.to_string(),
            requested_by: input.requested_by,
            comments: validate_comment(input.comments.as_deref())?,
        })
    }

    /// Decides an adjustment currently in `current`.
    ///
    /// # Returns
    /// * `Ok(Applied)` from `pending`; approval carries `AdjustTotal(delta)`
    /// * `Ok(Unchanged)` if the adjustment already has the target status
    /// * `Err(LeaveError::InvalidAdjustmentTransition)` when flipping a decided adjustment
    pub fn decide(
        current: AdjustmentStatus,
        decision: AdjustmentDecision,
        delta: Days,
        decided_by: UserId,
        comments: Option<&str>,
    ) -> Result<AdjustmentOutcome, LeaveError> {
        let target = decision.target();
        if current == target {
            return Ok(AdjustmentOutcome::Unchanged);
        }
        if current != AdjustmentStatus::Pending {
            return Err(LeaveError::InvalidAdjustmentTransition {
                from: current,
                to: target,
            });
        }

        let ledger_op = match decision {
            AdjustmentDecision::Approve => Some(LedgerOperation::AdjustTotal(delta)),
            AdjustmentDecision::Reject => None,
        };

        Ok(AdjustmentOutcome::Applied {
            status: target,
            ledger_op,
            decided_by,
            comments: validate_comment(comments)?,
        })
    }
}
