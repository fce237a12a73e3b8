//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `EmployeeId` where a
//! `ProjectId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant (workshop).");
typed_id!(UserId, "Unique identifier for a user account.");
typed_id!(EmployeeId, "Unique identifier for an employee.");
typed_id!(WorkPeriodId, "Unique identifier for a temporary work period.");
typed_id!(LoanId, "Unique identifier for an employee loan.");
typed_id!(LoanPaymentId, "Unique identifier for a loan payment.");
typed_id!(ProjectId, "Unique identifier for a project.");
typed_id!(WorkOrderId, "Unique identifier for a work order.");
typed_id!(RawMaterialId, "Unique identifier for a raw material.");
typed_id!(TaskId, "Unique identifier for a project task.");
typed_id!(ExpenseId, "Unique identifier for a project expense.");
typed_id!(TimelineEntryId, "Unique identifier for a timeline entry.");
