//! Repository abstractions for the ledger and roll-up operations.
//!
//! Repositories compose the pure rules in `fabrika-core` with the document
//! store: validation happens against fresh reads inside atomic
//! transactions, parent aggregates are updated by increment in the same
//! commit, and timeline entries are appended best-effort afterwards.

pub mod loan;
pub mod project;
pub mod timeline;
pub mod work_order;
pub mod work_period;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod work_order_tests;

pub use loan::{CreateLoanInput, LoanRepository, LoanRepositoryError};
pub use project::{
    CreateExpenseInput, CreateProjectInput, CreateTaskInput, ProjectRepository,
    ProjectRepositoryError,
};
pub use timeline::TimelineRepository;
pub use work_order::{
    CreateWorkOrderInput, MaterialRequirement, WorkOrderRepository, WorkOrderRepositoryError,
};
pub use work_period::{WorkPeriodRepository, WorkPeriodRepositoryError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::StoreError;

/// Collection names used by the repositories.
pub mod collections {
    /// Temporary work periods.
    pub const WORK_PERIODS: &str = "work_periods";
    /// Employee loans.
    pub const LOANS: &str = "loans";
    /// Immutable loan payments.
    pub const LOAN_PAYMENTS: &str = "loan_payments";
    /// Projects.
    pub const PROJECTS: &str = "projects";
    /// Work orders.
    pub const WORK_ORDERS: &str = "work_orders";
    /// Project expenses.
    pub const EXPENSES: &str = "expenses";
    /// Project tasks.
    pub const TASKS: &str = "tasks";
    /// Append-only project timeline.
    pub const PROJECT_TIMELINE: &str = "project_timeline";
}

/// Decodes a stored document into a typed record.
pub(crate) fn decode<D: DeserializeOwned>(value: Value) -> Result<D, StoreError> {
    Ok(serde_json::from_value(value)?)
}
