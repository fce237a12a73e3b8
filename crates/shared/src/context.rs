//! Explicit request context for ledger operations.
//!
//! Every mutating operation takes the acting principal and tenant as
//! explicit arguments instead of reading ambient global state.

use crate::types::{TenantId, UserId};

/// The tenant and acting principal for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// The tenant (workshop) the operation belongs to.
    pub tenant_id: TenantId,
    /// The user performing the operation.
    pub user_id: UserId,
}

impl RequestContext {
    /// Creates a new request context.
    #[must_use]
    pub const fn new(tenant_id: TenantId, user_id: UserId) -> Self {
        Self { tenant_id, user_id }
    }
}
