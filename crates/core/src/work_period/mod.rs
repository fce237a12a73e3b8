//! Temporary employment periods and their derived totals.
//!
//! A work period is a bounded, flat-daily-rate stint distinct from
//! permanent payroll. Its totals (days, salary, loans, net payable) are
//! cached projections: always derivable from the period dates, the daily
//! rate, and the loans referencing the period, and recomputed on every
//! mutating event rather than hand-edited.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkPeriodError;
pub use service::{PeriodTotals, WorkPeriodService};
pub use types::{WorkPeriod, WorkPeriodStatus};
