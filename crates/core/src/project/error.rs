//! Project error types.

use thiserror::Error;

use fabrika_shared::types::{ExpenseId, ProjectId, TaskId};

/// Errors that can occur during project operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Project not found.
    #[error("Project not found: {0}")]
    NotFound(ProjectId),

    /// Expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// The expense is not pending and cannot be approved.
    #[error("Expense {expense_id} is {status} and cannot be approved")]
    ExpenseNotPending {
        /// The expense.
        expense_id: ExpenseId,
        /// Its current status.
        status: &'static str,
    },

    /// Expense amount must be strictly positive.
    #[error("Expense amount must be positive")]
    NonPositiveExpenseAmount,
}

impl ProjectError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "PROJECT_NOT_FOUND",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::TaskNotFound(_) => "TASK_NOT_FOUND",
            Self::ExpenseNotPending { .. } => "EXPENSE_NOT_PENDING",
            Self::NonPositiveExpenseAmount => "NON_POSITIVE_EXPENSE_AMOUNT",
        }
    }
}
