//! Project domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fabrika_shared::types::{ExpenseId, ProjectId, TaskId, TenantId, UserId};

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Quotation accepted or manually created, not yet started.
    Planned,
    /// Execution underway.
    InProgress,
    /// Temporarily halted.
    OnHold,
    /// Finished.
    Completed,
    /// Abandoned.
    Cancelled,
}

/// The cost aggregate fields of a project.
///
/// Maintained incrementally; `actual_cost` must equal the sum of the three
/// component costs at every observation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Accumulated material costs from work orders and expenses.
    pub materials_cost: Decimal,
    /// Accumulated labor costs from work orders and expenses.
    pub labor_cost: Decimal,
    /// Accumulated overhead costs from expenses.
    pub overhead_cost: Decimal,
    /// Total: `materials_cost + labor_cost + overhead_cost`.
    pub actual_cost: Decimal,
}

impl CostBreakdown {
    /// True if `actual_cost` equals the sum of its components.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.actual_cost == self.materials_cost + self.labor_cost + self.overhead_cost
    }
}

/// Top-level cost/revenue container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// The project ID.
    pub id: ProjectId,
    /// The tenant the project belongs to.
    pub tenant_id: TenantId,
    /// Project name.
    pub name: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Agreed sales price.
    pub sales_price: Decimal,
    /// Estimated total cost at quotation time.
    pub estimated_cost: Decimal,
    /// Derived cost aggregates.
    #[serde(flatten)]
    pub costs: CostBreakdown,
    /// Task-weighted completion percentage.
    pub progress_percent: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Expense category, routing the amount into one cost component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    /// Routed to `materials_cost`.
    Materials,
    /// Routed to `labor_cost`.
    Labor,
    /// Routed to `overhead_cost`.
    Overhead,
}

/// Expense approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// Awaiting approval; not yet part of project costs.
    Pending,
    /// Approved and rolled into project costs.
    Approved,
    /// Rejected; never affects project costs.
    Rejected,
}

/// A project expense, contributing to costs only once approved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// The expense ID.
    pub id: ExpenseId,
    /// The tenant the expense belongs to.
    pub tenant_id: TenantId,
    /// The project the expense is charged to.
    pub project_id: ProjectId,
    /// Which cost component the amount routes into.
    pub category: ExpenseCategory,
    /// The expense amount.
    pub amount: Decimal,
    /// Approval status.
    pub status: ExpenseStatus,
    /// What the expense was for.
    pub description: String,
    /// The user who approved the expense, once approved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Task completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Underway.
    InProgress,
    /// Finished; counts toward progress.
    Done,
}

/// A unit of project work, weighted by estimated hours for progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// The task ID.
    pub id: TaskId,
    /// The tenant the task belongs to.
    pub tenant_id: TenantId,
    /// The project the task belongs to.
    pub project_id: ProjectId,
    /// Task name.
    pub name: String,
    /// Completion status.
    pub status: TaskStatus,
    /// Progress weight; tasks without an estimate weigh 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Decimal>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
