//! Document-store abstraction and repositories for Fabrika.
//!
//! This crate owns everything that touches persistence:
//!
//! - `store` - the document-store trait, the optimistic transaction runner,
//!   the two-tier query fallback, and an in-memory backend
//! - `repositories` - the ledger and roll-up operations, composing pure
//!   `fabrika-core` rules with atomic store transactions

pub mod repositories;
pub mod store;
