//! Work order cost roll-up rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::ledger;

use super::error::WorkOrderError;
use super::types::{WorkOrder, WorkOrderMaterial, WorkOrderStatus};

/// Single-session ceiling for one labor log entry.
const MAX_SESSION_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// The outcome of a validated material consumption, before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialConsumption {
    /// The line's cumulative used quantity after the event.
    pub new_quantity_used: Decimal,
    /// The line's total cost after the event.
    pub new_total_cost: Decimal,
    /// The incremental cost this event adds to work order and project.
    pub cost_delta: Decimal,
}

/// Side effects of a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// The new status.
    pub status: WorkOrderStatus,
    /// Start timestamp to stamp, when entering `InProgress` the first time.
    pub stamp_start: Option<DateTime<Utc>>,
    /// End timestamp to stamp, when entering `Completed`.
    pub stamp_end: Option<DateTime<Utc>>,
    /// Progress override, forced to 100 on completion.
    pub force_progress: Option<Decimal>,
}

/// Work order service for business logic.
pub struct WorkOrderService;

impl WorkOrderService {
    /// Validates a consumption event against a material line.
    ///
    /// The line's remaining headroom (`required - used`) is a bounded
    /// balance capped at `quantity_required`; consuming reduces it. The
    /// whole event is rejected when it would overrun - no clamping.
    ///
    /// # Errors
    ///
    /// Returns `WorkOrderError::NonPositiveQuantity` or
    /// `WorkOrderError::QuantityOverrun` (carrying remaining, requested,
    /// and required figures).
    pub fn consume_material(
        line: &WorkOrderMaterial,
        quantity: Decimal,
    ) -> Result<MaterialConsumption, WorkOrderError> {
        let reduction =
            ledger::apply_reduction(line.remaining_quantity(), line.quantity_required, quantity)
                .map_err(|e| match e {
                    ledger::ReductionError::NonPositiveDelta(q) => {
                        WorkOrderError::NonPositiveQuantity(q)
                    }
                    ledger::ReductionError::InsufficientBalance {
                        available,
                        requested,
                    } => WorkOrderError::QuantityOverrun {
                        remaining: available,
                        requested,
                        required: line.quantity_required,
                    },
                    ledger::ReductionError::BalanceOutOfBounds { balance, .. } => {
                        WorkOrderError::QuantityOverrun {
                            remaining: balance,
                            requested: quantity,
                            required: line.quantity_required,
                        }
                    }
                })?;

        let new_quantity_used = line.quantity_required - reduction.new_balance;
        let new_total_cost = new_quantity_used * line.unit_cost;

        Ok(MaterialConsumption {
            new_quantity_used,
            new_total_cost,
            cost_delta: new_total_cost - line.total_cost,
        })
    }

    /// Validates a labor log entry.
    ///
    /// # Errors
    ///
    /// Returns `WorkOrderError::NonPositiveHours` for `hours <= 0` and
    /// `WorkOrderError::HoursAboveSessionCap` for `hours > 24`.
    pub fn validate_labor_hours(hours: Decimal) -> Result<(), WorkOrderError> {
        if hours <= Decimal::ZERO {
            return Err(WorkOrderError::NonPositiveHours(hours));
        }
        if hours > MAX_SESSION_HOURS {
            return Err(WorkOrderError::HoursAboveSessionCap(hours));
        }
        Ok(())
    }

    /// Recomputes a work order's actual cost from materials plus labor.
    #[must_use]
    pub fn actual_cost(
        materials: &[WorkOrderMaterial],
        labor_hours: Decimal,
        labor_cost_per_hour: Decimal,
    ) -> Decimal {
        let material_cost: Decimal = materials.iter().map(|m| m.total_cost).sum();
        material_cost + labor_hours * labor_cost_per_hour
    }

    /// Computes the side effects of a status change.
    ///
    /// Any status may follow any non-terminal status. The first transition
    /// into `InProgress` stamps the actual start; entering `Completed`
    /// stamps the actual end and forces progress to 100%.
    ///
    /// # Errors
    ///
    /// Returns `WorkOrderError::TerminalStatus` when the work order is
    /// already `Completed` or `Cancelled`.
    pub fn change_status(
        work_order: &WorkOrder,
        new_status: WorkOrderStatus,
        now: DateTime<Utc>,
    ) -> Result<StatusChange, WorkOrderError> {
        if work_order.status.is_terminal() {
            return Err(WorkOrderError::TerminalStatus {
                work_order_id: work_order.id,
                status: match work_order.status {
                    WorkOrderStatus::Completed => "completed",
                    _ => "cancelled",
                },
            });
        }

        let stamp_start = (new_status == WorkOrderStatus::InProgress
            && work_order.actual_start_date.is_none())
        .then_some(now);

        let (stamp_end, force_progress) = if new_status == WorkOrderStatus::Completed {
            (Some(now), Some(Decimal::ONE_HUNDRED))
        } else {
            (None, None)
        };

        Ok(StatusChange {
            status: new_status,
            stamp_start,
            stamp_end,
            force_progress,
        })
    }
}
