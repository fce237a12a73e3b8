//! Work order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fabrika_shared::types::{ProjectId, RawMaterialId, TenantId, WorkOrderId};

/// Work order lifecycle status.
///
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkOrderStatus {
    /// Created, not yet started.
    Pending,
    /// Execution underway.
    InProgress,
    /// Execution temporarily halted.
    Paused,
    /// Finished; progress forced to 100%.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl WorkOrderStatus {
    /// Returns true if no further status change is allowed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// One material requirement line on a work order.
///
/// `quantity_required` is the ceiling fixed at creation; `quantity_used`
/// accumulates consumption events and may never exceed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderMaterial {
    /// The raw material consumed by this line.
    pub raw_material_id: RawMaterialId,
    /// Maximum quantity this line may consume.
    pub quantity_required: Decimal,
    /// Cumulative quantity consumed so far.
    pub quantity_used: Decimal,
    /// Cost per unit of the material.
    pub unit_cost: Decimal,
    /// Derived: `quantity_used * unit_cost`.
    pub total_cost: Decimal,
}

impl WorkOrderMaterial {
    /// Creates an unused requirement line.
    #[must_use]
    pub fn new(raw_material_id: RawMaterialId, quantity_required: Decimal, unit_cost: Decimal) -> Self {
        Self {
            raw_material_id,
            quantity_required,
            quantity_used: Decimal::ZERO,
            unit_cost,
            total_cost: Decimal::ZERO,
        }
    }

    /// The quantity still available for consumption.
    #[must_use]
    pub fn remaining_quantity(&self) -> Decimal {
        self.quantity_required - self.quantity_used
    }
}

/// One production/service phase within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    /// The work order ID.
    pub id: WorkOrderId,
    /// The tenant the work order belongs to.
    pub tenant_id: TenantId,
    /// The parent project.
    pub project_id: ProjectId,
    /// Short description of the phase.
    pub name: String,
    /// Lifecycle status.
    pub status: WorkOrderStatus,
    /// Material requirement lines.
    pub materials: Vec<WorkOrderMaterial>,
    /// Cumulative labor hours logged.
    pub labor_hours: Decimal,
    /// Labor rate applied to logged hours.
    pub labor_cost_per_hour: Decimal,
    /// Derived: material costs plus labor cost.
    pub actual_cost: Decimal,
    /// Completion percentage, forced to 100 on completion.
    pub progress_percent: Decimal,
    /// Stamped on the first transition into `InProgress`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_start_date: Option<DateTime<Utc>>,
    /// Stamped on the transition into `Completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_end_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_terminal_statuses() {
        assert!(WorkOrderStatus::Completed.is_terminal());
        assert!(WorkOrderStatus::Cancelled.is_terminal());
        assert!(!WorkOrderStatus::Pending.is_terminal());
        assert!(!WorkOrderStatus::InProgress.is_terminal());
        assert!(!WorkOrderStatus::Paused.is_terminal());
    }

    #[test]
    fn test_new_material_line_is_unused() {
        let line = WorkOrderMaterial::new(RawMaterialId::new(), dec!(10), dec!(5));
        assert_eq!(line.quantity_used, dec!(0));
        assert_eq!(line.total_cost, dec!(0));
        assert_eq!(line.remaining_quantity(), dec!(10));
    }
}
