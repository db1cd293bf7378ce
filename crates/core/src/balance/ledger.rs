//! Ledger counter operations.
//!
//! `LedgerOperation::apply` is the only place counters change. It does not
//! range-check: a negative derived remaining balance is written as-is.
//! Callers that need stronger guarantees check `expect_counters` first.
//! Every counter is stored as `NUMERIC(6,2)`, so `check_capacity` rejects a
//! result outside `±MAX_COUNTER_DAYS` before it reaches storage.

use leavewise_shared::types::Days;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::types::{BalanceKey, LeaveBalance};
use crate::error::LeaveError;

/// Largest magnitude a ledger counter can hold (9999.99).
pub const MAX_COUNTER_DAYS: Decimal = Decimal::from_parts(999_999, 0, 0, false, 2);

/// Fails with `LedgerCapacityExceeded` if `days` does not fit a ledger counter.
pub fn check_counter(key: BalanceKey, days: Days) -> Result<(), LeaveError> {
    if days.value().abs() <= MAX_COUNTER_DAYS {
        Ok(())
    } else {
        Err(LeaveError::LedgerCapacityExceeded {
            key,
            limit: Days::from_stored(MAX_COUNTER_DAYS),
        })
    }
}

/// A single mutation of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "days", rename_all = "snake_case")]
pub enum LedgerOperation {
    /// `pending += days` on submission.
    Reserve(Days),
    /// `pending -= days`, `used += days` on approval.
    Commit(Days),
    /// `pending -= days` on rejection or cancellation of a pending request.
    Release(Days),
    /// `used -= days` on cancellation of an approved request.
    ReleaseUsed(Days),
    /// `total += delta` on an approved adjustment.
    AdjustTotal(Days),
}

impl LedgerOperation {
    /// Returns the operation name used in logs and audit.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reserve(_) => "reserve",
            Self::Commit(_) => "commit",
            Self::Release(_) => "release",
            Self::ReleaseUsed(_) => "release_used",
            Self::AdjustTotal(_) => "adjust_total",
        }
    }

    /// Returns the day quantity carried by the operation.
    #[must_use]
    pub fn days(&self) -> Days {
        match *self {
            Self::Reserve(d)
            | Self::Commit(d)
            | Self::Release(d)
            | Self::ReleaseUsed(d)
            | Self::AdjustTotal(d) => d,
        }
    }

    /// Applies the operation to the row's counters.
    pub fn apply(&self, balance: &mut LeaveBalance) {
        match *self {
            Self::Reserve(days) => balance.pending_days += days,
            Self::Commit(days) => {
                balance.pending_days -= days;
                balance.used_days += days;
            }
            Self::Release(days) => balance.pending_days -= days,
            Self::ReleaseUsed(days) => balance.used_days -= days,
            Self::AdjustTotal(delta) => balance.total_days += delta,
        }
    }

    /// Checks that the row still holds what this operation is about to take back.
    ///
    /// A commit or release needs the reservation to still be in `pending`; a
    /// used-release needs the committed days to still be in `used`. If they
    /// are not, the row was changed underneath the request.
    pub fn expect_counters(&self, balance: &LeaveBalance) -> Result<(), LeaveError> {
        match *self {
            Self::Commit(days) | Self::Release(days) if balance.pending_days < days => {
                Err(LeaveError::ConflictingState(format!(
                    "{} of {days} days needs pending >= {days}, ledger {} has {}",
                    self.name(),
                    balance.id,
                    balance.pending_days
                )))
            }
            Self::ReleaseUsed(days) if balance.used_days < days => {
                Err(LeaveError::ConflictingState(format!(
                    "release_used of {days} days needs used >= {days}, ledger {} has {}",
                    balance.id, balance.used_days
                )))
            }
            _ => Ok(()),
        }
    }

    /// Checks that every counter still fits its column after the operation.
    pub fn check_capacity(&self, balance: &LeaveBalance) -> Result<(), LeaveError> {
        let mut after = balance.clone();
        self.apply(&mut after);
        [after.total_days, after.used_days, after.pending_days]
            .into_iter()
            .try_for_each(|days| check_counter(balance.key, days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use leavewise_shared::types::{EmployeeId, LeaveTypeId, OrganizationId};
    use rust_decimal_macros::dec;

    fn balance(total: i64) -> LeaveBalance {
        let key = BalanceKey::new(EmployeeId::new(), LeaveTypeId::new(), 2026);
        LeaveBalance::initial(OrganizationId::new(), key, Days::whole(total))
    }

    #[test]
    fn test_reserve_commit_cancel_full_reversal() {
        let mut b = balance(10);

        LedgerOperation::Reserve(Days::whole(3)).apply(&mut b);
        assert_eq!((b.used_days, b.pending_days), (Days::ZERO, Days::whole(3)));

        LedgerOperation::Commit(Days::whole(3)).apply(&mut b);
        assert_eq!((b.used_days, b.pending_days), (Days::whole(3), Days::ZERO));

        LedgerOperation::ReleaseUsed(Days::whole(3)).apply(&mut b);
        assert_eq!((b.used_days, b.pending_days), (Days::ZERO, Days::ZERO));
        assert_eq!(b.remaining_days(), Days::whole(10));
    }

    #[test]
    fn test_release_returns_reservation() {
        let mut b = balance(10);
        LedgerOperation::Reserve(Days::whole(4)).apply(&mut b);
        LedgerOperation::Release(Days::whole(4)).apply(&mut b);
        assert_eq!(b.pending_days, Days::ZERO);
        assert_eq!(b.used_days, Days::ZERO);
    }

    #[test]
    fn test_adjust_total_is_signed() {
        let mut b = balance(10);
        LedgerOperation::AdjustTotal(Days::whole(2)).apply(&mut b);
        assert_eq!(b.total_days, Days::whole(12));
        LedgerOperation::AdjustTotal(Days::whole(-5)).apply(&mut b);
        assert_eq!(b.total_days, Days::whole(7));
    }

    #[test]
    fn test_apply_does_not_clamp() {
        let mut b = balance(1);
        LedgerOperation::Reserve(Days::whole(3)).apply(&mut b);
        assert_eq!(b.remaining_days(), Days::whole(-2));
    }

    #[test]
    fn test_expect_counters_detects_missing_reservation() {
        let mut b = balance(10);
        LedgerOperation::Reserve(Days::whole(2)).apply(&mut b);

        assert!(LedgerOperation::Commit(Days::whole(2)).expect_counters(&b).is_ok());
        let err = LedgerOperation::Commit(Days::whole(3))
            .expect_counters(&b)
            .unwrap_err();
        assert!(matches!(err, LeaveError::ConflictingState(_)));
        assert!(
            LedgerOperation::ReleaseUsed(Days::whole(1))
                .expect_counters(&b)
                .is_err()
        );
        assert!(
            LedgerOperation::Reserve(Days::whole(100))
                .expect_counters(&b)
                .is_ok()
        );
    }

    #[test]
    fn test_check_capacity_bounds_every_counter() {
        let b = balance(9999);

        assert!(
            LedgerOperation::AdjustTotal(Days::new(dec!(0.99)).unwrap())
                .check_capacity(&b)
                .is_ok()
        );
        let err = LedgerOperation::AdjustTotal(Days::whole(2))
            .check_capacity(&b)
            .unwrap_err();
        assert!(matches!(
            err,
            LeaveError::LedgerCapacityExceeded { key, .. } if key == b.key
        ));
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let mut small = balance(10);
        small.pending_days = Days::whole(9999);
        assert!(
            LedgerOperation::Reserve(Days::whole(1))
                .check_capacity(&small)
                .is_err()
        );
        assert!(
            LedgerOperation::Release(Days::whole(1))
                .check_capacity(&small)
                .is_ok()
        );
        assert!(
            LedgerOperation::AdjustTotal(Days::whole(-10_010))
                .check_capacity(&small)
                .is_err()
        );
    }

    #[test]
    fn test_check_counter_accepts_the_limit() {
        let key = BalanceKey::new(EmployeeId::new(), LeaveTypeId::new(), 2026);
        assert!(check_counter(key, Days::from_stored(MAX_COUNTER_DAYS)).is_ok());
        assert!(check_counter(key, Days::from_stored(-MAX_COUNTER_DAYS)).is_ok());
        assert!(check_counter(key, Days::whole(10_000)).is_err());
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(LedgerOperation::Reserve(Days::ZERO).name(), "reserve");
        assert_eq!(LedgerOperation::ReleaseUsed(Days::ZERO).name(), "release_used");
        assert_eq!(
            LedgerOperation::AdjustTotal(Days::whole(2)).days(),
            Days::whole(2)
        );
    }
}
