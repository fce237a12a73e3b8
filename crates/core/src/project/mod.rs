//! Project cost aggregates and task-weighted progress.
//!
//! Project cost fields are write-side aggregates: child events (material
//! consumption, labor, approved expenses) push increments at the moment
//! they occur, and `actual_cost` always equals the sum of the three
//! component costs. Progress is the one pull-based aggregate, recomputed
//! by scanning tasks on demand.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod progress_props;

pub use error::ProjectError;
pub use service::{CostComponent, ProjectService};
pub use types::{
    CostBreakdown, Expense, ExpenseCategory, ExpenseStatus, Project, ProjectStatus, Task,
    TaskStatus,
};
