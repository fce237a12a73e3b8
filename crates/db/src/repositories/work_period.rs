//! Work period repository: lifecycle and derived totals.
//!
//! Totals recomputation is read-then-write without isolation: its
//! triggering events (loan add/delete, period close) are rare, and a stale
//! read self-heals on the next recompute. The invariant-critical loan
//! payment path never goes through here.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use fabrika_core::loan::Loan;
use fabrika_core::work_period::{WorkPeriod, WorkPeriodError, WorkPeriodService, WorkPeriodStatus};
use fabrika_shared::RequestContext;
use fabrika_shared::types::{EmployeeId, WorkPeriodId};

use crate::store::{DocumentStore, Query, StoreError, query_with_fallback};

use super::{collections, decode};

/// Errors surfaced by the work period repository.
#[derive(Debug, Error)]
pub enum WorkPeriodRepositoryError {
    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] WorkPeriodError),

    /// The store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Repository for temporary work periods.
#[derive(Clone)]
pub struct WorkPeriodRepository {
    store: Arc<dyn DocumentStore>,
}

impl WorkPeriodRepository {
    /// Creates a new work period repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Starts a new period for an employee.
    ///
    /// # Errors
    ///
    /// Fails with `WorkPeriodError::ActivePeriodExists` when the employee
    /// already has an active period, and with
    /// `WorkPeriodError::NonPositiveDailyRate` for a bad rate.
    pub async fn start_period(
        &self,
        ctx: &RequestContext,
        employee_id: EmployeeId,
        daily_rate: Decimal,
        start_date: NaiveDate,
    ) -> Result<WorkPeriod, WorkPeriodRepositoryError> {
        WorkPeriodService::validate_start(daily_rate)?;

        if self.find_active(ctx, employee_id).await?.is_some() {
            return Err(WorkPeriodError::ActivePeriodExists(employee_id).into());
        }

        // A period that starts in the future still counts its first day.
        let as_of = Utc::now().date_naive().max(start_date);
        let totals = WorkPeriodService::compute_totals(start_date, as_of, daily_rate, &[])?;

        let mut period = WorkPeriod {
            id: WorkPeriodId::new(),
            tenant_id: ctx.tenant_id,
            employee_id,
            start_date,
            end_date: None,
            status: WorkPeriodStatus::Active,
            daily_rate,
            total_days: 0,
            total_salary: Decimal::ZERO,
            total_loans: Decimal::ZERO,
            net_payable: Decimal::ZERO,
            created_at: Utc::now(),
        };
        WorkPeriodService::apply_totals(&mut period, totals);

        self.store
            .insert(collections::WORK_PERIODS, serde_json::to_value(&period).map_err(StoreError::from)?)
            .await?;

        info!(period_id = %period.id, %employee_id, "work period started");
        Ok(period)
    }

    /// Fetches a period by id.
    pub async fn get(
        &self,
        id: WorkPeriodId,
    ) -> Result<Option<WorkPeriod>, WorkPeriodRepositoryError> {
        let doc = self.store.get(collections::WORK_PERIODS, &id.to_string()).await?;
        doc.map(decode).transpose().map_err(Into::into)
    }

    /// Finds an employee's active period, if any.
    pub async fn find_active(
        &self,
        ctx: &RequestContext,
        employee_id: EmployeeId,
    ) -> Result<Option<WorkPeriod>, WorkPeriodRepositoryError> {
        let query = Query::unfiltered()
            .filter("tenant_id", ctx.tenant_id.to_string())
            .filter("employee_id", employee_id.to_string())
            .filter("status", "active");

        let docs =
            query_with_fallback(self.store.as_ref(), collections::WORK_PERIODS, &query).await?;
        docs.into_iter().next().map(decode).transpose().map_err(Into::into)
    }

    /// Recomputes a period's totals as of today.
    ///
    /// Idempotent and safe to call repeatedly; invoked after every loan
    /// add or delete.
    pub async fn recalculate_totals(
        &self,
        ctx: &RequestContext,
        period_id: WorkPeriodId,
    ) -> Result<WorkPeriod, WorkPeriodRepositoryError> {
        self.recalculate_totals_as_of(ctx, period_id, Utc::now().date_naive())
            .await
    }

    /// Recomputes a period's totals as of a fixed date.
    pub async fn recalculate_totals_as_of(
        &self,
        ctx: &RequestContext,
        period_id: WorkPeriodId,
        as_of: NaiveDate,
    ) -> Result<WorkPeriod, WorkPeriodRepositoryError> {
        let mut period = self
            .get(period_id)
            .await?
            .ok_or(WorkPeriodError::NotFound(period_id))?;

        let principals = self.loan_principals(ctx, period_id).await?;
        let effective_end = period.effective_end(as_of).max(period.start_date);
        let totals = WorkPeriodService::compute_totals(
            period.start_date,
            effective_end,
            period.daily_rate,
            &principals,
        )?;
        WorkPeriodService::apply_totals(&mut period, totals);

        self.store
            .set(
                collections::WORK_PERIODS,
                &period.id.to_string(),
                serde_json::to_value(&period).map_err(StoreError::from)?,
            )
            .await?;

        debug!(%period_id, total_loans = %period.total_loans, "work period totals recomputed");
        Ok(period)
    }

    /// Ends a period, freezing its totals at the supplied end date.
    ///
    /// After this point totals are no longer auto-recomputed even if loans
    /// are retroactively added; post-close corrections call
    /// `recalculate_totals` explicitly.
    ///
    /// # Errors
    ///
    /// Fails with `WorkPeriodError::AlreadyCompleted` for a completed
    /// period and `WorkPeriodError::EndBeforeStart` for a bad end date.
    pub async fn end_period(
        &self,
        ctx: &RequestContext,
        period_id: WorkPeriodId,
        end_date: NaiveDate,
    ) -> Result<WorkPeriod, WorkPeriodRepositoryError> {
        let mut period = self
            .get(period_id)
            .await?
            .ok_or(WorkPeriodError::NotFound(period_id))?;
        WorkPeriodService::validate_end(&period)?;

        let principals = self.loan_principals(ctx, period_id).await?;
        let totals = WorkPeriodService::compute_totals(
            period.start_date,
            end_date,
            period.daily_rate,
            &principals,
        )?;

        period.end_date = Some(end_date);
        period.status = WorkPeriodStatus::Completed;
        WorkPeriodService::apply_totals(&mut period, totals);

        self.store
            .set(
                collections::WORK_PERIODS,
                &period.id.to_string(),
                serde_json::to_value(&period).map_err(StoreError::from)?,
            )
            .await?;

        info!(%period_id, net_payable = %period.net_payable, "work period ended");
        Ok(period)
    }

    /// Loads the principal amounts of every loan referencing a period,
    /// regardless of repayment status.
    async fn loan_principals(
        &self,
        ctx: &RequestContext,
        period_id: WorkPeriodId,
    ) -> Result<Vec<Decimal>, WorkPeriodRepositoryError> {
        let query = Query::unfiltered()
            .filter("tenant_id", ctx.tenant_id.to_string())
            .filter("work_period_id", period_id.to_string());

        let docs = query_with_fallback(self.store.as_ref(), collections::LOANS, &query).await?;
        let loans: Vec<Loan> = docs
            .into_iter()
            .map(decode)
            .collect::<Result<_, _>>()?;
        Ok(loans.into_iter().map(|l| l.amount).collect())
    }
}
