//! Property-based tests for the dataset freshness rule.
//!
//! Cached dataset info stays usable for two calendar months after its
//! publication date and is stale from the day after.

use bondsite_core::dataset::DatasetInfo;
use chrono::{Duration, Months, NaiveDate};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// Generates a publication date between 2000 and 2099.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=365).prop_map(|(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal).expect("ordinal within every year")
    })
}

fn info(data_date: NaiveDate) -> DatasetInfo {
    DatasetInfo::new(data_date, "https://www.gov.pl/attachment/data.xls")
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_stale_iff_past_two_months(data_date in arb_date(), offset in 0i64..200) {
        let today = data_date + Duration::days(offset);
        let limit = data_date.checked_add_months(Months::new(2)).unwrap();
        prop_assert_eq!(info(data_date).is_stale(today), today > limit);
    }

    #[test]
    fn prop_never_stale_within_fifty_nine_days(data_date in arb_date(), offset in 0i64..=59) {
        let today = data_date + Duration::days(offset);
        prop_assert!(!info(data_date).is_stale(today));
    }

    #[test]
    fn prop_always_stale_after_sixty_two_days(data_date in arb_date(), offset in 63i64..1000) {
        let today = data_date + Duration::days(offset);
        prop_assert!(info(data_date).is_stale(today));
    }

    #[test]
    fn prop_staleness_is_monotonic(data_date in arb_date(), offset in 0i64..120, later in 0i64..120) {
        let info = info(data_date);
        let today = data_date + Duration::days(offset);
        if info.is_stale(today) {
            prop_assert!(info.is_stale(today + Duration::days(later)));
        }
    }

    #[test]
    fn prop_future_dated_info_is_fresh(data_date in arb_date(), ahead in 1i64..400) {
        let today = data_date - Duration::days(ahead);
        prop_assert!(!info(data_date).is_stale(today));
    }
}
