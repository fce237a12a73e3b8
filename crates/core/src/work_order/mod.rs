//! Work order materials, labor, and cost roll-up.
//!
//! A work order is one execution phase of a project. Material consumption
//! and labor hours accumulate on the work order; every such event recomputes
//! the work order's actual cost and yields the incremental delta the
//! repository rolls up to the parent project in the same atomic step.

pub mod error;
pub mod service;
pub mod types;

pub use error::WorkOrderError;
pub use service::{MaterialConsumption, StatusChange, WorkOrderService};
pub use types::{WorkOrder, WorkOrderMaterial, WorkOrderStatus};
