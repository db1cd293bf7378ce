//! Property-based tests for range intersection.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use crate::overlap::DateRange;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
}

fn arb_range() -> impl Strategy<Value = DateRange> {
    (0i64..120, 0i64..30).prop_map(|(offset, len)| {
        let start = base() + Duration::days(offset);
        DateRange::new(start, start + Duration::days(len)).expect("ordered")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_overlap_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// The closed-interval test agrees with "some day is in both ranges".
    #[test]
    fn prop_overlap_matches_shared_day(a in arb_range(), b in arb_range()) {
        let shared = a
            .start()
            .iter_days()
            .take_while(|d| *d <= a.end())
            .any(|d| b.contains(d));
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    #[test]
    fn prop_range_overlaps_itself(a in arb_range()) {
        prop_assert!(a.overlaps(&a));
    }
}
