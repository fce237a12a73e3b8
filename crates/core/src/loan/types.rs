//! Loan domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fabrika_shared::types::{
    EmployeeId, LoanId, LoanPaymentId, TenantId, UserId, WorkPeriodId,
};

use crate::ledger::SettlementStatus;

/// Loan repayment status, derived from the remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// No payment applied yet (`remaining_balance == amount`).
    Pending,
    /// Partially repaid (`0 < remaining_balance < amount`).
    Partial,
    /// Fully repaid (`remaining_balance == 0`).
    Paid,
}

impl LoanStatus {
    /// Maps a settlement status onto the loan status vocabulary.
    #[must_use]
    pub const fn from_settlement(status: SettlementStatus) -> Self {
        match status {
            SettlementStatus::Outstanding => Self::Pending,
            SettlementStatus::Partial => Self::Partial,
            SettlementStatus::Settled => Self::Paid,
        }
    }
}

/// How a payment was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Entered by an operator.
    Manual,
    /// Applied automatically when a work period is closed.
    Deduction,
}

/// An advance against a specific work period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// The loan ID.
    pub id: LoanId,
    /// The tenant the loan belongs to.
    pub tenant_id: TenantId,
    /// The employee who received the loan.
    pub employee_id: EmployeeId,
    /// The work period the loan is charged against.
    pub work_period_id: WorkPeriodId,
    /// Original principal. Immutable after creation.
    pub amount: Decimal,
    /// Outstanding balance, reduced by payments. `0 <= remaining <= amount`.
    pub remaining_balance: Decimal,
    /// Repayment status derived from the remaining balance.
    pub status: LoanStatus,
    /// Why the loan was granted.
    pub reason: String,
    /// Business date of the disbursement.
    pub date: NaiveDate,
    /// The user who approved the loan.
    pub approved_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An immutable reduction event against a loan's balance.
///
/// `balance_before`/`balance_after` are captured at application time as an
/// audit snapshot. Payments are never updated or deleted individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPayment {
    /// The payment ID.
    pub id: LoanPaymentId,
    /// The tenant the payment belongs to.
    pub tenant_id: TenantId,
    /// The loan the payment reduces.
    pub loan_id: LoanId,
    /// The employee the loan belongs to.
    pub employee_id: EmployeeId,
    /// The work period the loan is charged against.
    pub work_period_id: WorkPeriodId,
    /// Amount applied against the balance.
    pub amount: Decimal,
    /// How the payment was initiated.
    pub payment_type: PaymentType,
    /// Loan balance before this payment was applied.
    pub balance_before: Decimal,
    /// Loan balance after this payment was applied.
    pub balance_after: Decimal,
    /// The user who processed the payment.
    pub processed_by: UserId,
    /// Optional free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_settlement() {
        assert_eq!(
            LoanStatus::from_settlement(SettlementStatus::Outstanding),
            LoanStatus::Pending
        );
        assert_eq!(
            LoanStatus::from_settlement(SettlementStatus::Partial),
            LoanStatus::Partial
        );
        assert_eq!(
            LoanStatus::from_settlement(SettlementStatus::Settled),
            LoanStatus::Paid
        );
    }
}
