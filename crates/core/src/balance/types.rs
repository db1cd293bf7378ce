//! Ledger key and ledger row types.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use leavewise_shared::types::{Days, EmployeeId, LeaveBalanceId, LeaveTypeId, OrganizationId};
use serde::{Deserialize, Serialize};

/// Unique key of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BalanceKey {
    /// Employee the entitlement belongs to.
    pub employee_id: EmployeeId,
    /// Leave type the entitlement is for.
    pub leave_type_id: LeaveTypeId,
    /// Calendar year.
    pub year: i32,
}

impl BalanceKey {
    /// Creates a new key.
    #[must_use]
    pub const fn new(employee_id: EmployeeId, leave_type_id: LeaveTypeId, year: i32) -> Self {
        Self {
            employee_id,
            leave_type_id,
            year,
        }
    }

    /// Key charged by a request starting on `start_date`.
    ///
    /// A request is charged entirely to the year it starts in.
    #[must_use]
    pub fn for_request(
        employee_id: EmployeeId,
        leave_type_id: LeaveTypeId,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(employee_id, leave_type_id, start_date.year())
    }
}

impl fmt::Display for BalanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "employee {} / leave type {} / {}",
            self.employee_id, self.leave_type_id, self.year
        )
    }
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Row identifier.
    pub id: LeaveBalanceId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Ledger key.
    pub key: BalanceKey,
    /// Entitlement for the year, including approved adjustments.
    pub total_days: Days,
    /// Days consumed by approved requests.
    pub used_days: Days,
    /// Days reserved by requests awaiting a decision.
    pub pending_days: Days,
}

impl LeaveBalance {
    /// Creates a fresh row with nothing used or pending.
    #[must_use]
    pub fn initial(organization_id: OrganizationId, key: BalanceKey, total_days: Days) -> Self {
        Self {
            id: LeaveBalanceId::new(),
            organization_id,
            key,
            total_days,
            used_days: Days::ZERO,
            pending_days: Days::ZERO,
        }
    }

    /// `total - used - pending`. May be negative; the ledger does not clamp it.
    #[must_use]
    pub fn remaining_days(&self) -> Days {
        self.total_days - self.used_days - self.pending_days
    }

    /// Days committed or reserved.
    #[must_use]
    pub fn allocated_days(&self) -> Days {
        self.used_days + self.pending_days
    }

    /// True when allocations exceed the entitlement.
    #[must_use]
    pub fn is_overallocated(&self) -> bool {
        self.remaining_days().is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balance(total: i64, used: i64, pending: i64) -> LeaveBalance {
        let key = BalanceKey::new(EmployeeId::new(), LeaveTypeId::new(), 2026);
        LeaveBalance {
            used_days: Days::whole(used),
            pending_days: Days::whole(pending),
            ..LeaveBalance::initial(OrganizationId::new(), key, Days::whole(total))
        }
    }

    #[test]
    fn test_remaining_is_derived() {
        let b = balance(20, 5, 3);
        assert_eq!(b.remaining_days(), Days::whole(12));
        assert_eq!(b.allocated_days(), Days::whole(8));
        assert!(!b.is_overallocated());
    }

    #[test]
    fn test_remaining_can_go_negative() {
        let b = balance(2, 2, 1);
        assert_eq!(b.remaining_days(), Days::whole(-1));
        assert!(b.is_overallocated());
    }

    #[test]
    fn test_half_days() {
        let mut b = balance(10, 0, 0);
        b.pending_days = Days::new(dec!(0.5)).unwrap();
        assert_eq!(b.remaining_days().value(), dec!(9.5));
    }

    #[test]
    fn test_key_for_request_uses_start_year() {
        let employee = EmployeeId::new();
        let leave_type = LeaveTypeId::new();
        let start = NaiveDate::from_ymd_opt(2026, 12, 30).unwrap();
        let key = BalanceKey::for_request(employee, leave_type, start);
        assert_eq!(key.year, 2026);
        assert_eq!(key.employee_id, employee);
    }
}
