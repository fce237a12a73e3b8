//! Work period domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fabrika_shared::types::{EmployeeId, TenantId, WorkPeriodId};

/// Work period lifecycle status.
///
/// `none -> active -> completed`; `completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkPeriodStatus {
    /// The period is open; totals track "now".
    Active,
    /// The period is closed; totals are frozen at the end date.
    Completed,
}

/// One open-ended employment stint for an employee paid a flat daily rate.
///
/// At most one `Active` period may exist per employee at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPeriod {
    /// The period ID.
    pub id: WorkPeriodId,
    /// The tenant the period belongs to.
    pub tenant_id: TenantId,
    /// The employee working the period.
    pub employee_id: EmployeeId,
    /// First working day (inclusive).
    pub start_date: NaiveDate,
    /// Last working day (inclusive); `None` while the period is open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: WorkPeriodStatus,
    /// Flat salary per worked day.
    pub daily_rate: Decimal,
    /// Derived: inclusive day count from start to effective end.
    pub total_days: i64,
    /// Derived: `total_days * daily_rate`.
    pub total_salary: Decimal,
    /// Derived: sum of loan principal charged against the period.
    pub total_loans: Decimal,
    /// Derived: `total_salary - total_loans`.
    pub net_payable: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl WorkPeriod {
    /// The end date used for totals: the fixed end date if set, else `as_of`.
    #[must_use]
    pub fn effective_end(&self, as_of: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or(as_of)
    }
}
