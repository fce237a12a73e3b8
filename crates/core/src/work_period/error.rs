//! Work period error types.

use chrono::NaiveDate;
use thiserror::Error;

use fabrika_shared::types::{EmployeeId, WorkPeriodId};

/// Errors that can occur during work period operations.
#[derive(Debug, Error)]
pub enum WorkPeriodError {
    /// The employee already has an active period.
    #[error("Employee {0} already has an active work period")]
    ActivePeriodExists(EmployeeId),

    /// Daily rate must be strictly positive.
    #[error("Daily rate must be positive")]
    NonPositiveDailyRate,

    /// The end date precedes the start date.
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart {
        /// The period's first day.
        start: NaiveDate,
        /// The attempted end date.
        end: NaiveDate,
    },

    /// The period is already completed.
    #[error("Work period {0} is already completed")]
    AlreadyCompleted(WorkPeriodId),

    /// Work period not found.
    #[error("Work period not found: {0}")]
    NotFound(WorkPeriodId),
}

impl WorkPeriodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ActivePeriodExists(_) => "ACTIVE_PERIOD_EXISTS",
            Self::NonPositiveDailyRate => "NON_POSITIVE_DAILY_RATE",
            Self::EndBeforeStart { .. } => "END_BEFORE_START",
            Self::AlreadyCompleted(_) => "PERIOD_ALREADY_COMPLETED",
            Self::NotFound(_) => "WORK_PERIOD_NOT_FOUND",
        }
    }
}
