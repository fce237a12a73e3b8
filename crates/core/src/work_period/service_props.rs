//! Property-based tests for work period totals.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::WorkPeriodService;

/// Strategy for generating valid business dates.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Strategy for positive decimal amounts with 2 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Totals are reproducible**
    ///
    /// *For any* inputs, computing totals twice yields identical results.
    #[test]
    fn prop_totals_idempotent(
        start in date_strategy(),
        extra_days in 0i64..400,
        rate in amount_strategy(),
        principals in prop::collection::vec(amount_strategy(), 0..8),
    ) {
        let end = start + chrono::Duration::days(extra_days);
        let a = WorkPeriodService::compute_totals(start, end, rate, &principals).unwrap();
        let b = WorkPeriodService::compute_totals(start, end, rate, &principals).unwrap();
        prop_assert_eq!(a, b);
    }

    /// **Totals identity**
    ///
    /// *For any* inputs, `total_salary = total_days * rate` and
    /// `net_payable = total_salary - total_loans`.
    #[test]
    fn prop_totals_identity(
        start in date_strategy(),
        extra_days in 0i64..400,
        rate in amount_strategy(),
        principals in prop::collection::vec(amount_strategy(), 0..8),
    ) {
        let end = start + chrono::Duration::days(extra_days);
        let totals = WorkPeriodService::compute_totals(start, end, rate, &principals).unwrap();

        let expected_loans: Decimal = principals.iter().copied().sum();
        prop_assert_eq!(totals.total_days, extra_days + 1);
        prop_assert_eq!(totals.total_salary, Decimal::from(totals.total_days) * rate);
        prop_assert_eq!(totals.total_loans, expected_loans);
        prop_assert_eq!(totals.net_payable, totals.total_salary - totals.total_loans);
    }

    /// **Day count is inclusive and positive**
    ///
    /// *For any* ordered date pair, the count is at least 1 (same-day = 1).
    #[test]
    fn prop_day_count_inclusive(
        start in date_strategy(),
        extra_days in 0i64..1000,
    ) {
        let end = start + chrono::Duration::days(extra_days);
        let days = WorkPeriodService::day_count(start, end).unwrap();
        prop_assert_eq!(days, extra_days + 1);
        prop_assert!(days >= 1);
    }
}
