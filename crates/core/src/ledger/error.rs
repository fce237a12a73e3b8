//! Error types for balance reductions.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when reducing a bounded balance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReductionError {
    /// The reduction amount must be strictly positive.
    #[error("Reduction amount must be positive, got {0}")]
    NonPositiveDelta(Decimal),

    /// The reduction exceeds the available balance.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// The balance available for reduction.
        available: Decimal,
        /// The amount the caller attempted to reduce.
        requested: Decimal,
    },

    /// The balance is outside its own `[0, cap]` bound.
    ///
    /// This indicates corrupted state, not caller error.
    #[error("Balance {balance} is outside [0, {cap}]")]
    BalanceOutOfBounds {
        /// The stored balance.
        balance: Decimal,
        /// The upper bound the balance must not exceed.
        cap: Decimal,
    },
}

impl ReductionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveDelta(_) => "NON_POSITIVE_AMOUNT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::BalanceOutOfBounds { .. } => "BALANCE_OUT_OF_BOUNDS",
        }
    }
}
