//! Common type definitions shared across crates.

mod id;

pub use id::{
    EmployeeId, ExpenseId, LoanId, LoanPaymentId, ProjectId, RawMaterialId, TaskId,
    TenantId, TimelineEntryId, UserId, WorkOrderId, WorkPeriodId,
};
