//! Property-based tests for LifecycleService.

use chrono::{Duration, NaiveDate};
use leavewise_shared::types::{Days, EmployeeId, LeaveRequestId, LeaveTypeId, OrganizationId, UserId};
use proptest::prelude::*;

use crate::balance::{BalanceKey, LeaveBalance};
use crate::error::LeaveError;
use crate::request::service::LifecycleService;
use crate::request::types::{LeaveRequestSnapshot, LeaveStatus};

fn arb_status() -> impl Strategy<Value = LeaveStatus> {
    prop_oneof![
        Just(LeaveStatus::Pending),
        Just(LeaveStatus::Approved),
        Just(LeaveStatus::Rejected),
        Just(LeaveStatus::Cancelled),
    ]
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date")
}

fn arb_snapshot() -> impl Strategy<Value = LeaveRequestSnapshot> {
    (arb_status(), -30i64..30, 1i64..=10).prop_map(|(status, offset, days)| LeaveRequestSnapshot {
        id: LeaveRequestId::new(),
        status,
        start_date: today() + Duration::days(offset),
        days: Days::whole(days),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A transition succeeds exactly when its target is in the allowed set,
    /// and a failure reports that same set.
    #[test]
    fn prop_plan_agrees_with_allowed_targets(request in arb_snapshot(), target in arb_status()) {
        let allowed = LifecycleService::allowed_targets(request.status, request.start_date, today());
        let result = LifecycleService::plan_transition(&request, target, UserId::new(), None, today());

        match result {
            Ok(plan) => {
                prop_assert!(allowed.contains(&target));
                prop_assert_eq!(plan.from, request.status);
                prop_assert_eq!(plan.ledger_op.days(), request.days);
            }
            Err(LeaveError::InvalidTransition { from, to, allowed: reported }) => {
                prop_assert!(!allowed.contains(&target));
                prop_assert_eq!(from, request.status);
                prop_assert_eq!(to, target);
                prop_assert_eq!(reported, allowed);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Terminal requests accept nothing; pending never goes back to pending.
    #[test]
    fn prop_terminal_states_are_final(request in arb_snapshot()) {
        let allowed = LifecycleService::allowed_targets(request.status, request.start_date, today());
        if request.status.is_terminal() {
            prop_assert!(allowed.is_empty());
        }
        prop_assert!(!allowed.contains(&LeaveStatus::Pending));
    }

    /// Retrying a transition after it was applied always fails.
    #[test]
    fn prop_retry_after_transition_fails(request in arb_snapshot(), target in arb_status()) {
        if let Ok(plan) =
            LifecycleService::plan_transition(&request, target, UserId::new(), None, today())
        {
            let moved = LeaveRequestSnapshot { status: plan.to, ..request };
            let retry = LifecycleService::plan_transition(&moved, target, UserId::new(), None, today());
            let is_invalid_transition = matches!(retry, Err(LeaveError::InvalidTransition { .. }));
            prop_assert!(is_invalid_transition);
        }
    }

    /// With overdrafts forbidden, a request passes iff it fits in remaining.
    #[test]
    fn prop_strict_balance_check(total in 0i64..=30, used in 0i64..=30, requested in 1i64..=30) {
        let key = BalanceKey::new(EmployeeId::new(), LeaveTypeId::new(), 2026);
        let mut balance = LeaveBalance::initial(OrganizationId::new(), key, Days::whole(total));
        balance.used_days = Days::whole(used);

        let strict = crate::policy::LeavePolicy::strict();
        let result = LifecycleService::check_balance(&strict, &balance, Days::whole(requested));
        prop_assert_eq!(result.is_ok(), requested <= total - used);
    }
}
