//! Project aggregation rules: expense routing and weighted progress.

use rust_decimal::Decimal;

use super::error::ProjectError;
use super::types::{CostBreakdown, Expense, ExpenseCategory, ExpenseStatus, Task, TaskStatus};

/// The cost component a delta applies to.
///
/// Every delta also applies to `actual_cost` in the same step, keeping the
/// cost identity intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostComponent {
    /// `materials_cost`.
    Materials,
    /// `labor_cost`.
    Labor,
    /// `overhead_cost`.
    Overhead,
}

impl CostComponent {
    /// The document field name backing this component.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Materials => "materials_cost",
            Self::Labor => "labor_cost",
            Self::Overhead => "overhead_cost",
        }
    }
}

/// Project service for business logic.
pub struct ProjectService;

impl ProjectService {
    /// Routes an expense category to the cost component it increments.
    #[must_use]
    pub const fn expense_target(category: ExpenseCategory) -> CostComponent {
        match category {
            ExpenseCategory::Materials => CostComponent::Materials,
            ExpenseCategory::Labor => CostComponent::Labor,
            ExpenseCategory::Overhead => CostComponent::Overhead,
        }
    }

    /// Validates that an expense may be approved.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::ExpenseNotPending` unless the expense is
    /// `Pending`.
    pub fn validate_approval(expense: &Expense) -> Result<(), ProjectError> {
        match expense.status {
            ExpenseStatus::Pending => Ok(()),
            ExpenseStatus::Approved => Err(ProjectError::ExpenseNotPending {
                expense_id: expense.id,
                status: "approved",
            }),
            ExpenseStatus::Rejected => Err(ProjectError::ExpenseNotPending {
                expense_id: expense.id,
                status: "rejected",
            }),
        }
    }

    /// Applies a delta to one component and to `actual_cost` together.
    pub fn apply_cost_delta(costs: &mut CostBreakdown, component: CostComponent, delta: Decimal) {
        match component {
            CostComponent::Materials => costs.materials_cost += delta,
            CostComponent::Labor => costs.labor_cost += delta,
            CostComponent::Overhead => costs.overhead_cost += delta,
        }
        costs.actual_cost += delta;
    }

    /// Task-weighted completion percentage.
    ///
    /// Weight is `estimated_hours`, or 1 for tasks without an estimate.
    /// Only `Done` tasks count toward the numerator. Returns `None` when
    /// there are no tasks (the stored percentage is then left unchanged).
    #[must_use]
    pub fn progress_percent(tasks: &[Task]) -> Option<Decimal> {
        if tasks.is_empty() {
            return None;
        }

        let weight = |task: &Task| task.estimated_hours.unwrap_or(Decimal::ONE);
        let total_weight: Decimal = tasks.iter().map(weight).sum();
        if total_weight <= Decimal::ZERO {
            return Some(Decimal::ZERO);
        }

        let done_weight: Decimal = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .map(weight)
            .sum();

        Some((Decimal::ONE_HUNDRED * done_weight / total_weight).round_dp(0))
    }
}
