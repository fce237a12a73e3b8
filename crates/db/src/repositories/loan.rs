//! Loan repository: loans, payments, and automatic deductions.
//!
//! Payments are the invariant-critical path: they always run inside an
//! atomic transaction that re-reads the loan, validates the amount against
//! that fresh read, and writes the immutable payment record together with
//! the loan update. Loan add/delete trigger a work period recompute; a
//! payment does not, because period totals track principal.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use fabrika_core::loan::{Loan, LoanError, LoanPayment, LoanService, LoanStatus, PaymentType};
use fabrika_core::work_period::WorkPeriodError;
use fabrika_shared::RequestContext;
use fabrika_shared::types::{EmployeeId, LoanId, LoanPaymentId, UserId, WorkPeriodId};

use futures::FutureExt;

use crate::store::{Direction, DocumentStore, Query, StoreError, query_with_fallback, run_transaction};

use super::work_period::{WorkPeriodRepository, WorkPeriodRepositoryError};
use super::{collections, decode};

/// Errors surfaced by the loan repository.
#[derive(Debug, Error)]
pub enum LoanRepositoryError {
    /// A loan domain rule was violated.
    #[error(transparent)]
    Domain(#[from] LoanError),

    /// The referenced work period failed a rule (usually not found).
    #[error(transparent)]
    Period(#[from] WorkPeriodError),

    /// The store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<WorkPeriodRepositoryError> for LoanRepositoryError {
    fn from(err: WorkPeriodRepositoryError) -> Self {
        match err {
            WorkPeriodRepositoryError::Domain(e) => Self::Period(e),
            WorkPeriodRepositoryError::Store(e) => Self::Store(e),
        }
    }
}

/// Input for registering a loan.
#[derive(Debug, Clone)]
pub struct CreateLoanInput {
    /// The employee receiving the advance.
    pub employee_id: EmployeeId,
    /// The work period the loan is charged against.
    pub work_period_id: WorkPeriodId,
    /// Principal amount.
    pub amount: Decimal,
    /// Why the loan was granted.
    pub reason: String,
    /// Business date of the disbursement.
    pub date: NaiveDate,
    /// The user who approved the loan.
    pub approved_by: UserId,
}

/// Repository for employee loans and payments.
#[derive(Clone)]
pub struct LoanRepository {
    store: Arc<dyn DocumentStore>,
    periods: WorkPeriodRepository,
    max_attempts: u32,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        periods: WorkPeriodRepository,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            periods,
            max_attempts,
        }
    }

    /// Registers a loan against a work period and recomputes the period's
    /// totals.
    ///
    /// # Errors
    ///
    /// Fails with `LoanError::NonPositiveAmount` for a bad amount and
    /// `WorkPeriodError::NotFound` when the period does not exist.
    pub async fn add_loan(
        &self,
        ctx: &RequestContext,
        input: CreateLoanInput,
    ) -> Result<Loan, LoanRepositoryError> {
        LoanService::validate_amount(input.amount)?;

        // Not-found is checked before any write.
        self.periods
            .get(input.work_period_id)
            .await?
            .ok_or(WorkPeriodError::NotFound(input.work_period_id))?;

        let loan = Loan {
            id: LoanId::new(),
            tenant_id: ctx.tenant_id,
            employee_id: input.employee_id,
            work_period_id: input.work_period_id,
            amount: input.amount,
            remaining_balance: input.amount,
            status: LoanStatus::Pending,
            reason: input.reason,
            date: input.date,
            approved_by: input.approved_by,
            created_at: Utc::now(),
        };

        self.store
            .insert(collections::LOANS, serde_json::to_value(&loan).map_err(StoreError::from)?)
            .await?;

        self.periods
            .recalculate_totals(ctx, input.work_period_id)
            .await?;

        info!(loan_id = %loan.id, amount = %loan.amount, "loan registered");
        Ok(loan)
    }

    /// Fetches a loan by id.
    pub async fn get(&self, id: LoanId) -> Result<Option<Loan>, LoanRepositoryError> {
        let doc = self.store.get(collections::LOANS, &id.to_string()).await?;
        doc.map(decode).transpose().map_err(Into::into)
    }

    /// Applies a payment to a loan inside a single atomic transaction.
    ///
    /// The loan is re-read inside the transaction; the amount is validated
    /// against that fresh balance; the immutable payment record and the
    /// loan update commit together or not at all. Period totals are not
    /// recomputed - they track principal, not remaining balance.
    ///
    /// # Errors
    ///
    /// Fails with `LoanError::InsufficientBalance` (carrying both figures)
    /// when the amount exceeds the remaining balance.
    pub async fn add_payment(
        &self,
        ctx: &RequestContext,
        loan_id: LoanId,
        amount: Decimal,
        payment_type: PaymentType,
        notes: Option<String>,
    ) -> Result<LoanPayment, LoanRepositoryError> {
        let ctx = *ctx;
        let payment = run_transaction(self.store.as_ref(), self.max_attempts, move |txn| {
            let notes = notes.clone();
            async move {
                let mut loan: Loan = txn
                    .get(collections::LOANS, &loan_id.to_string())
                    .await?
                    .ok_or(LoanError::NotFound(loan_id))?;

                let application = LoanService::apply_payment(&loan, amount)?;

                let payment = LoanPayment {
                    id: LoanPaymentId::new(),
                    tenant_id: ctx.tenant_id,
                    loan_id,
                    employee_id: loan.employee_id,
                    work_period_id: loan.work_period_id,
                    amount,
                    payment_type,
                    balance_before: application.balance_before,
                    balance_after: application.balance_after,
                    processed_by: ctx.user_id,
                    notes,
                    created_at: Utc::now(),
                };

                loan.remaining_balance = application.balance_after;
                loan.status = application.new_status;

                txn.set(collections::LOANS, &loan_id.to_string(), &loan)?;
                txn.set(
                    collections::LOAN_PAYMENTS,
                    &payment.id.to_string(),
                    &payment,
                )?;

                Ok::<_, LoanRepositoryError>(payment)
            }
            .boxed()
        })
        .await?;

        info!(
            %loan_id,
            amount = %payment.amount,
            balance_after = %payment.balance_after,
            "loan payment applied"
        );
        Ok(payment)
    }

    /// Deletes a loan and recomputes the period's totals.
    ///
    /// This is the manual-correction escape hatch, not part of the normal
    /// flow: it performs no balance validation.
    pub async fn delete_loan(
        &self,
        ctx: &RequestContext,
        loan_id: LoanId,
        period_id: WorkPeriodId,
    ) -> Result<(), LoanRepositoryError> {
        self.get(loan_id).await?.ok_or(LoanError::NotFound(loan_id))?;

        self.store.delete(collections::LOANS, &loan_id.to_string()).await?;
        self.periods.recalculate_totals(ctx, period_id).await?;

        info!(%loan_id, %period_id, "loan deleted as manual correction");
        Ok(())
    }

    /// Applies an automatic deduction when closing a period with unpaid
    /// loans.
    ///
    /// No-op (returns `None`) when the loan is already fully paid or the
    /// cap is not positive; otherwise applies
    /// `min(capped_amount, remaining_balance)` as a `Deduction` payment.
    pub async fn process_automatic_deduction(
        &self,
        ctx: &RequestContext,
        loan_id: LoanId,
        capped_amount: Decimal,
    ) -> Result<Option<LoanPayment>, LoanRepositoryError> {
        let loan = self.get(loan_id).await?.ok_or(LoanError::NotFound(loan_id))?;

        let Some(amount) = LoanService::deduction_amount(&loan, capped_amount) else {
            return Ok(None);
        };

        let payment = self
            .add_payment(
                ctx,
                loan_id,
                amount,
                PaymentType::Deduction,
                Some("Automatic deduction on period close".to_string()),
            )
            .await?;
        Ok(Some(payment))
    }

    /// Lists the payments recorded against a loan, oldest first.
    pub async fn payments_for_loan(
        &self,
        ctx: &RequestContext,
        loan_id: LoanId,
    ) -> Result<Vec<LoanPayment>, LoanRepositoryError> {
        let query = Query::unfiltered()
            .filter("tenant_id", ctx.tenant_id.to_string())
            .filter("loan_id", loan_id.to_string())
            .order_by("created_at", Direction::Ascending);

        let docs =
            query_with_fallback(self.store.as_ref(), collections::LOAN_PAYMENTS, &query).await?;
        docs.into_iter()
            .map(decode)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }
}
