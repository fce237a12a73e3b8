//! Work order error types.

use rust_decimal::Decimal;
use thiserror::Error;

use fabrika_shared::types::{RawMaterialId, WorkOrderId};

/// Errors that can occur during work order operations.
#[derive(Debug, Error)]
pub enum WorkOrderError {
    /// Work order not found.
    #[error("Work order not found: {0}")]
    NotFound(WorkOrderId),

    /// The work order has no material line for the given raw material.
    #[error("Work order {work_order_id} has no material line for {raw_material_id}")]
    MaterialNotFound {
        /// The work order searched.
        work_order_id: WorkOrderId,
        /// The raw material that has no line.
        raw_material_id: RawMaterialId,
    },

    /// Consumption quantity must be strictly positive.
    #[error("Consumption quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// The consumption would exceed the line's required quantity.
    #[error(
        "Consumption of {requested} exceeds remaining quantity {remaining} (required {required})"
    )]
    QuantityOverrun {
        /// Quantity still available on the line.
        remaining: Decimal,
        /// Quantity the caller attempted to consume.
        requested: Decimal,
        /// The line's fixed ceiling.
        required: Decimal,
    },

    /// Labor hours must be strictly positive.
    #[error("Labor hours must be positive, got {0}")]
    NonPositiveHours(Decimal),

    /// Labor hours exceed the single-session ceiling.
    #[error("Labor hours {0} exceed the 24-hour session ceiling")]
    HoursAboveSessionCap(Decimal),

    /// The work order is in a terminal status.
    #[error("Work order {work_order_id} is {status} and cannot change status")]
    TerminalStatus {
        /// The work order.
        work_order_id: WorkOrderId,
        /// The terminal status it is in.
        status: &'static str,
    },
}

impl WorkOrderError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "WORK_ORDER_NOT_FOUND",
            Self::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::QuantityOverrun { .. } => "QUANTITY_OVERRUN",
            Self::NonPositiveHours(_) => "NON_POSITIVE_HOURS",
            Self::HoursAboveSessionCap(_) => "HOURS_ABOVE_SESSION_CAP",
            Self::TerminalStatus { .. } => "TERMINAL_STATUS",
        }
    }
}
