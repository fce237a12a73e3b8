//! Loan error types.

use rust_decimal::Decimal;
use thiserror::Error;

use fabrika_shared::types::LoanId;

use crate::ledger::ReductionError;

/// Errors that can occur during loan operations.
#[derive(Debug, Error)]
pub enum LoanError {
    /// Loan amount must be strictly positive.
    #[error("Loan amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Payment amount must be strictly positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositivePayment(Decimal),

    /// The payment exceeds the loan's remaining balance.
    #[error(
        "Payment of {requested} exceeds remaining balance of {remaining} on loan {loan_id}"
    )]
    InsufficientBalance {
        /// The loan being paid.
        loan_id: LoanId,
        /// The loan's remaining balance.
        remaining: Decimal,
        /// The attempted payment amount.
        requested: Decimal,
    },

    /// The loan's stored balance violates `0 <= remaining <= amount`.
    #[error("Loan {loan_id} has corrupted balance {balance} (amount {amount})")]
    CorruptedBalance {
        /// The loan with the bad balance.
        loan_id: LoanId,
        /// The stored remaining balance.
        balance: Decimal,
        /// The loan principal.
        amount: Decimal,
    },

    /// Loan not found.
    #[error("Loan not found: {0}")]
    NotFound(LoanId),
}

impl LoanError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_LOAN_AMOUNT",
            Self::NonPositivePayment(_) => "NON_POSITIVE_PAYMENT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::CorruptedBalance { .. } => "CORRUPTED_BALANCE",
            Self::NotFound(_) => "LOAN_NOT_FOUND",
        }
    }

    /// Translates a reduction failure on a specific loan.
    #[must_use]
    pub fn from_reduction(loan_id: LoanId, amount: Decimal, err: ReductionError) -> Self {
        match err {
            ReductionError::NonPositiveDelta(delta) => Self::NonPositivePayment(delta),
            ReductionError::InsufficientBalance {
                available,
                requested,
            } => Self::InsufficientBalance {
                loan_id,
                remaining: available,
                requested,
            },
            ReductionError::BalanceOutOfBounds { balance, .. } => Self::CorruptedBalance {
                loan_id,
                balance,
                amount,
            },
        }
    }
}
