//! Property-based tests for the bounded-balance reduction primitive.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::ReductionError;
use super::reduction::{SettlementStatus, apply_reduction, settlement_status};

/// Strategy for generating positive decimal amounts with 2 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a cap plus a sequence of proposed reductions against it.
fn cap_and_deltas_strategy() -> impl Strategy<Value = (Decimal, Vec<Decimal>)> {
    (amount_strategy(), prop::collection::vec(amount_strategy(), 1..20))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// **Balance monotonicity**
    ///
    /// *For any* sequence of reductions applied to a fresh balance, the
    /// balance is non-increasing and never leaves `[0, cap]`, regardless of
    /// how many reductions are rejected along the way.
    #[test]
    fn prop_balance_monotone_and_bounded((cap, deltas) in cap_and_deltas_strategy()) {
        let mut balance = cap;

        for delta in deltas {
            let before = balance;
            if let Ok(r) = apply_reduction(balance, cap, delta) {
                balance = r.new_balance;
            }
            prop_assert!(balance <= before, "balance must be non-increasing");
            prop_assert!(balance >= Decimal::ZERO, "balance must never go negative");
            prop_assert!(balance <= cap, "balance must never exceed cap");
        }
    }

    /// **Status is exactly the balance partition**
    ///
    /// *For any* successful reduction, the returned status is `Settled` iff
    /// the new balance is zero, `Outstanding` iff it equals the cap, and
    /// `Partial` otherwise.
    #[test]
    fn prop_status_matches_partition((cap, deltas) in cap_and_deltas_strategy()) {
        let mut balance = cap;

        for delta in deltas {
            if let Ok(r) = apply_reduction(balance, cap, delta) {
                balance = r.new_balance;
                let expected = if balance.is_zero() {
                    SettlementStatus::Settled
                } else if balance < cap {
                    SettlementStatus::Partial
                } else {
                    SettlementStatus::Outstanding
                };
                prop_assert_eq!(r.status, expected);
                prop_assert_eq!(settlement_status(balance, cap), expected);
            }
        }
    }

    /// **Rejections carry both figures and change nothing**
    ///
    /// *For any* overdraw attempt, the error reports the available balance
    /// and the requested amount exactly as supplied.
    #[test]
    fn prop_overdraw_reports_figures(
        balance in amount_strategy(),
        excess in amount_strategy(),
    ) {
        let cap = balance;
        let requested = balance + excess;

        let err = apply_reduction(balance, cap, requested).unwrap_err();
        prop_assert_eq!(
            err,
            ReductionError::InsufficientBalance { available: balance, requested }
        );
    }

    /// **Exact settlement is always accepted**
    ///
    /// *For any* balance, reducing by exactly the balance settles it.
    #[test]
    fn prop_exact_settlement(balance in amount_strategy()) {
        let r = apply_reduction(balance, balance, balance).unwrap();
        prop_assert_eq!(r.new_balance, Decimal::ZERO);
        prop_assert_eq!(r.status, SettlementStatus::Settled);
    }
}
