//! Lifecycle service for leave request state transitions.
//!
//! The service is stateless and never touches storage. It turns inputs into
//! validated requests and transition plans; the caller runs the resulting
//! ledger operation inside its transaction.

use chrono::NaiveDate;
use leavewise_shared::types::{Days, UserId};

use crate::balance::{BalanceKey, LeaveBalance, LedgerOperation};
use crate::error::LeaveError;
use crate::leave_type::LeaveTypePolicy;
use crate::overlap::DateRange;
use crate::policy::LeavePolicy;
use crate::request::types::{
    LeaveAction, LeaveRequestSnapshot, LeaveStatus, NewLeaveRequest, TransitionPlan,
    ValidatedLeaveRequest,
};

/// Minimum trimmed reason length.
pub const MIN_REASON_LEN: usize = 5;
/// Maximum trimmed reason length.
pub const MAX_REASON_LEN: usize = 500;
/// Maximum comment length.
pub const MAX_COMMENT_LEN: usize = 1000;

/// Stateless service for leave request creation and transitions.
pub struct LifecycleService;

impl LifecycleService {
    /// Validates a creation input against its leave type.
    ///
    /// Checks, in order: reason length, date order, a non-zero working-day
    /// count, the per-request maximum and, when the policy asks for it, the
    /// leave type's minimum notice. The leave type must already have been
    /// resolved within the request's organization.
    pub fn validate_new_request(
        input: &NewLeaveRequest,
        leave_type: &LeaveTypePolicy,
        policy: &LeavePolicy,
        today: NaiveDate,
    ) -> Result<ValidatedLeaveRequest, LeaveError> {
        let reason = validate_reason(&input.reason)?;
        let range = DateRange::new(input.start_date, input.end_date)?;

        let days = range.working_days()?;
        if !days.is_positive() {
            return Err(LeaveError::NoWorkingDays {
                start: input.start_date,
                end: input.end_date,
            });
        }

        leave_type.check_max_days(days)?;
        if policy.enforce_min_notice {
            leave_type.check_notice(input.start_date, today)?;
        }

        Ok(ValidatedLeaveRequest {
            employee_id: input.employee_id,
            leave_type_id: input.leave_type_id,
            range,
            days,
            reason,
            key: BalanceKey::for_request(input.employee_id, leave_type.id, input.start_date),
            submitted_by: input.submitted_by,
        })
    }

    /// Rejects overdrafts when the policy forbids a negative remaining balance.
    pub fn check_balance(
        policy: &LeavePolicy,
        balance: &LeaveBalance,
        requested: Days,
    ) -> Result<(), LeaveError> {
        if policy.allow_negative_balance {
            return Ok(());
        }
        let remaining = balance.remaining_days();
        if requested > remaining {
            return Err(LeaveError::InsufficientBalance {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    /// Targets reachable from `status` for a request starting on `start_date`.
    #[must_use]
    pub fn allowed_targets(
        status: LeaveStatus,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Vec<LeaveStatus> {
        match status {
            LeaveStatus::Pending => vec![
                LeaveStatus::Approved,
                LeaveStatus::Rejected,
                LeaveStatus::Cancelled,
            ],
            LeaveStatus::Approved if start_date > today => vec![LeaveStatus::Cancelled],
            LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled => Vec::new(),
        }
    }

    /// Plans moving `request` into `target`.
    ///
    /// # Returns
    /// * `Ok(TransitionPlan)` naming the ledger effect and audit fields
    /// * `Err(LeaveError::InvalidTransition)` if `target` is not reachable,
    ///   including cancelling an approved request on or after its start date
    /// * `Err(LeaveError::Validation)` if the comment is too long or an
    ///   approval has no approver
    pub fn plan_transition(
        request: &LeaveRequestSnapshot,
        target: LeaveStatus,
        actor: UserId,
        comment: Option<&str>,
        today: NaiveDate,
    ) -> Result<TransitionPlan, LeaveError> {
        let comment = validate_comment(comment)?;

        let allowed = Self::allowed_targets(request.status, request.start_date, today);
        if !allowed.contains(&target) {
            return Err(LeaveError::InvalidTransition {
                from: request.status,
                to: target,
                allowed,
            });
        }

        if target == LeaveStatus::Approved && actor.is_nil() {
            return Err(LeaveError::Validation("Approver is required".to_string()));
        }

        let ledger_op = match (request.status, target) {
            (LeaveStatus::Pending, LeaveStatus::Approved) => LedgerOperation::Commit(request.days),
            (LeaveStatus::Approved, LeaveStatus::Cancelled) => {
                LedgerOperation::ReleaseUsed(request.days)
            }
            _ => LedgerOperation::Release(request.days),
        };

        Ok(TransitionPlan {
            from: request.status,
            to: target,
            action: LeaveAction::for_target(target),
            ledger_op,
            actor,
            approved_by: (target == LeaveStatus::Approved).then_some(actor),
            comment,
        })
    }
}

fn validate_reason(reason: &str) -> Result<String, LeaveError> {
    let trimmed = reason.trim();
    let len = trimmed.chars().count();
    if !(MIN_REASON_LEN..=MAX_REASON_LEN).contains(&len) {
        return Err(LeaveError::Validation(format!(
            "Reason must be between {MIN_REASON_LEN} and {MAX_REASON_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional comment, mapping blank to `None`.
pub fn validate_comment(comment: Option<&str>) -> Result<Option<String>, LeaveError> {
    let Some(trimmed) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(LeaveError::Validation(format!(
            "Comments must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}
