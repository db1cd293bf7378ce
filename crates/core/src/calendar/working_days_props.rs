//! Property-based tests for working-day counting.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use crate::calendar::working_days::{is_working_day, working_days};
use leavewise_shared::types::Days;

/// Strategy for dates between 2000 and roughly 2060.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..22_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn brute_force(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut count = 0;
    let mut current = start;
    while current <= end {
        if is_working_day(current) {
            count += 1;
        }
        current += Duration::days(1);
    }
    count
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Closed-form count agrees with walking every day.
    #[test]
    fn prop_matches_day_walk(start in arb_date(), span in 0i64..800) {
        let end = start + Duration::days(span);
        let counted = working_days(start, end).unwrap();
        prop_assert_eq!(counted, Days::whole(brute_force(start, end)));
    }

    /// Same input, same output.
    #[test]
    fn prop_deterministic(start in arb_date(), span in 0i64..60) {
        let end = start + Duration::days(span);
        prop_assert_eq!(working_days(start, end).unwrap(), working_days(start, end).unwrap());
    }

    /// Splitting a range in two never changes the total.
    #[test]
    fn prop_additive(start in arb_date(), left in 0i64..40, right in 1i64..40) {
        let mid = start + Duration::days(left);
        let end = mid + Duration::days(right);
        let whole = working_days(start, end).unwrap();
        let parts = working_days(start, mid).unwrap()
            + working_days(mid + Duration::days(1), end).unwrap();
        prop_assert_eq!(whole, parts);
    }

    /// Any range ending before it starts is rejected.
    #[test]
    fn prop_reversed_range_rejected(start in arb_date(), gap in 1i64..100) {
        let end = start - Duration::days(gap);
        prop_assert!(working_days(start, end).is_err());
    }
}
