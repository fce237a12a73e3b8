//! Boundary-check-then-commit reduction of a bounded balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReductionError;

/// Where a balance sits between fully consumed and untouched.
///
/// The three-way partition maps onto loan statuses (paid / partial /
/// pending) and onto material lines (exhausted / partially used / unused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Nothing has been applied against the balance yet (`balance == cap`).
    Outstanding,
    /// The balance is partially consumed (`0 < balance < cap`).
    Partial,
    /// The balance is fully consumed (`balance == 0`).
    Settled,
}

/// The outcome of a successful reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    /// The balance after the reduction.
    pub new_balance: Decimal,
    /// The status derived from the new balance.
    pub status: SettlementStatus,
}

/// Derives the settlement status of a balance within `[0, cap]`.
#[must_use]
pub fn settlement_status(balance: Decimal, cap: Decimal) -> SettlementStatus {
    if balance.is_zero() {
        SettlementStatus::Settled
    } else if balance < cap {
        SettlementStatus::Partial
    } else {
        SettlementStatus::Outstanding
    }
}

/// Applies a reduction of `delta` to a balance bounded by `[0, cap]`.
///
/// The reduction is validated before anything is committed: the delta must
/// be strictly positive and must not push the balance below zero. A zero
/// cap with a zero balance is legal (an already-settled ledger).
///
/// # Errors
///
/// Returns `ReductionError::NonPositiveDelta` for `delta <= 0`,
/// `ReductionError::InsufficientBalance` when `delta > balance`, and
/// `ReductionError::BalanceOutOfBounds` when the stored balance itself
/// violates its bound.
pub fn apply_reduction(
    balance: Decimal,
    cap: Decimal,
    delta: Decimal,
) -> Result<Reduction, ReductionError> {
    if balance < Decimal::ZERO || balance > cap {
        return Err(ReductionError::BalanceOutOfBounds { balance, cap });
    }
    if delta <= Decimal::ZERO {
        return Err(ReductionError::NonPositiveDelta(delta));
    }
    if delta > balance {
        return Err(ReductionError::InsufficientBalance {
            available: balance,
            requested: delta,
        });
    }

    let new_balance = balance - delta;
    Ok(Reduction {
        new_balance,
        status: settlement_status(new_balance, cap),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reduction_to_partial() {
        let r = apply_reduction(dec!(50), dec!(50), dec!(30)).unwrap();
        assert_eq!(r.new_balance, dec!(20));
        assert_eq!(r.status, SettlementStatus::Partial);
    }

    #[test]
    fn test_reduction_to_settled() {
        let r = apply_reduction(dec!(20), dec!(50), dec!(20)).unwrap();
        assert_eq!(r.new_balance, dec!(0));
        assert_eq!(r.status, SettlementStatus::Settled);
    }

    #[test]
    fn test_rejects_zero_delta() {
        assert_eq!(
            apply_reduction(dec!(50), dec!(50), dec!(0)),
            Err(ReductionError::NonPositiveDelta(dec!(0)))
        );
    }

    #[test]
    fn test_rejects_negative_delta() {
        assert!(matches!(
            apply_reduction(dec!(50), dec!(50), dec!(-10)),
            Err(ReductionError::NonPositiveDelta(_))
        ));
    }

    #[test]
    fn test_rejects_overdraw_with_both_figures() {
        let err = apply_reduction(dec!(20), dec!(50), dec!(25)).unwrap_err();
        assert_eq!(
            err,
            ReductionError::InsufficientBalance {
                available: dec!(20),
                requested: dec!(25),
            }
        );
    }

    #[test]
    fn test_rejects_corrupted_balance() {
        assert!(matches!(
            apply_reduction(dec!(60), dec!(50), dec!(10)),
            Err(ReductionError::BalanceOutOfBounds { .. })
        ));
        assert!(matches!(
            apply_reduction(dec!(-1), dec!(50), dec!(10)),
            Err(ReductionError::BalanceOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_status_partition() {
        assert_eq!(settlement_status(dec!(50), dec!(50)), SettlementStatus::Outstanding);
        assert_eq!(settlement_status(dec!(1), dec!(50)), SettlementStatus::Partial);
        assert_eq!(settlement_status(dec!(0), dec!(50)), SettlementStatus::Settled);
    }
}
