//! Loan business rules: payment application and automatic deduction.

use rust_decimal::Decimal;

use crate::ledger;

use super::error::LoanError;
use super::types::{Loan, LoanStatus};

/// The result of applying a payment to a loan, before persistence.
///
/// Carries the before/after snapshot that the payment record stores as an
/// immutable audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentApplication {
    /// Loan balance before the payment.
    pub balance_before: Decimal,
    /// Loan balance after the payment.
    pub balance_after: Decimal,
    /// Loan status derived from the new balance.
    pub new_status: LoanStatus,
}

/// Loan service for business logic.
///
/// Contains pure rules with no persistence dependencies; the repository
/// layer applies these inside its atomic transactions.
pub struct LoanService;

impl LoanService {
    /// Validates a loan principal at registration time.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::NonPositiveAmount` for `amount <= 0`.
    pub fn validate_amount(amount: Decimal) -> Result<(), LoanError> {
        if amount <= Decimal::ZERO {
            return Err(LoanError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    /// Applies a payment against the loan's remaining balance.
    ///
    /// The loan principal is the cap: the balance can only move within
    /// `[0, amount]`, and the status follows the three-way partition.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::NonPositivePayment` for `amount <= 0` and
    /// `LoanError::InsufficientBalance` (with both figures) when the payment
    /// exceeds the remaining balance.
    pub fn apply_payment(loan: &Loan, amount: Decimal) -> Result<PaymentApplication, LoanError> {
        let reduction = ledger::apply_reduction(loan.remaining_balance, loan.amount, amount)
            .map_err(|e| LoanError::from_reduction(loan.id, loan.amount, e))?;

        Ok(PaymentApplication {
            balance_before: loan.remaining_balance,
            balance_after: reduction.new_balance,
            new_status: LoanStatus::from_settlement(reduction.status),
        })
    }

    /// The amount an automatic deduction would apply, if any.
    ///
    /// Returns `None` when the loan is already fully paid or the cap is not
    /// positive; otherwise `min(capped_amount, remaining_balance)`.
    #[must_use]
    pub fn deduction_amount(loan: &Loan, capped_amount: Decimal) -> Option<Decimal> {
        if loan.status == LoanStatus::Paid || capped_amount <= Decimal::ZERO {
            return None;
        }
        Some(capped_amount.min(loan.remaining_balance))
    }

    /// Derives the loan status from a stored balance.
    #[must_use]
    pub fn status_for_balance(remaining: Decimal, amount: Decimal) -> LoanStatus {
        LoanStatus::from_settlement(ledger::settlement_status(remaining, amount))
    }

    /// True if the loan's stored fields satisfy the balance invariant.
    #[must_use]
    pub fn balance_invariant_holds(loan: &Loan) -> bool {
        loan.remaining_balance >= Decimal::ZERO
            && loan.remaining_balance <= loan.amount
            && loan.status == Self::status_for_balance(loan.remaining_balance, loan.amount)
    }
}
