//! Bounded-balance reduction primitive.
//!
//! This module implements the one rule shared by every running balance in
//! the system: an event reduces a balance bounded by `[0, cap]`, and the
//! settlement status is derived from where the new balance falls. Loan
//! repayment uses it directly; material consumption uses it on the
//! remaining headroom (`required - used`).

pub mod error;
pub mod reduction;

#[cfg(test)]
mod reduction_props;

pub use error::ReductionError;
pub use reduction::{Reduction, SettlementStatus, apply_reduction, settlement_status};
