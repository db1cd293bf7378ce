//! Property-based tests for ledger operations.

use proptest::prelude::*;

use leavewise_shared::types::{Days, EmployeeId, LeaveTypeId, OrganizationId};

use crate::balance::ledger::LedgerOperation;
use crate::balance::types::{BalanceKey, LeaveBalance};

/// What happens to one reservation after it is made.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    StillPending,
    Approved,
    Released,
    ApprovedThenCancelled,
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::StillPending),
        Just(Outcome::Approved),
        Just(Outcome::Released),
        Just(Outcome::ApprovedThenCancelled),
    ]
}

/// Half-day granularity up to 30 days.
fn arb_days() -> impl Strategy<Value = Days> {
    (1i64..=60).prop_map(|halves| {
        Days::new(rust_decimal::Decimal::new(halves * 5, 1)).expect("one decimal place")
    })
}

fn fresh(total: i64) -> LeaveBalance {
    let key = BalanceKey::new(EmployeeId::new(), LeaveTypeId::new(), 2026);
    LeaveBalance::initial(OrganizationId::new(), key, Days::whole(total))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any replay of reservations and their outcomes, `pending` holds
    /// exactly the still-pending reservations and `used` exactly the approved ones.
    #[test]
    fn prop_counters_track_outstanding_effects(
        total in 0i64..=40,
        requests in prop::collection::vec((arb_days(), arb_outcome()), 0..20)
    ) {
        let mut balance = fresh(total);
        let mut expected_pending = Days::ZERO;
        let mut expected_used = Days::ZERO;

        for (days, outcome) in &requests {
            LedgerOperation::Reserve(*days).apply(&mut balance);
            match outcome {
                Outcome::StillPending => expected_pending += *days,
                Outcome::Approved => {
                    prop_assert!(LedgerOperation::Commit(*days).expect_counters(&balance).is_ok());
                    LedgerOperation::Commit(*days).apply(&mut balance);
                    expected_used += *days;
                }
                Outcome::Released => {
                    prop_assert!(LedgerOperation::Release(*days).expect_counters(&balance).is_ok());
                    LedgerOperation::Release(*days).apply(&mut balance);
                }
                Outcome::ApprovedThenCancelled => {
                    LedgerOperation::Commit(*days).apply(&mut balance);
                    prop_assert!(LedgerOperation::ReleaseUsed(*days).expect_counters(&balance).is_ok());
                    LedgerOperation::ReleaseUsed(*days).apply(&mut balance);
                }
            }
        }

        prop_assert_eq!(balance.pending_days, expected_pending);
        prop_assert_eq!(balance.used_days, expected_used);
        prop_assert_eq!(balance.total_days, Days::whole(total));
        prop_assert_eq!(
            balance.remaining_days(),
            Days::whole(total) - expected_pending - expected_used
        );
    }

    /// Counters never drift below zero when every effect is checked first.
    #[test]
    fn prop_checked_effects_keep_counters_non_negative(
        ops in prop::collection::vec((0u8..4, arb_days()), 0..30)
    ) {
        let mut balance = fresh(10);
        for (kind, days) in ops {
            let op = match kind {
                0 => LedgerOperation::Reserve(days),
                1 => LedgerOperation::Commit(days),
                2 => LedgerOperation::Release(days),
                _ => LedgerOperation::ReleaseUsed(days),
            };
            if op.expect_counters(&balance).is_ok() {
                op.apply(&mut balance);
            }
            prop_assert!(!balance.pending_days.is_negative());
            prop_assert!(!balance.used_days.is_negative());
        }
    }

    /// Adjustments only ever touch `total`.
    #[test]
    fn prop_adjust_total_is_isolated(delta in -100i64..=100) {
        let mut balance = fresh(10);
        LedgerOperation::Reserve(Days::whole(2)).apply(&mut balance);
        LedgerOperation::AdjustTotal(Days::whole(delta)).apply(&mut balance);
        prop_assert_eq!(balance.total_days, Days::whole(10 + delta));
        prop_assert_eq!(balance.pending_days, Days::whole(2));
        prop_assert_eq!(balance.used_days, Days::ZERO);
    }
}
