//! Append-only audit trail entries.
//!
//! Timeline entries record every state-changing project action for
//! traceability. They feed observability, never decision logic, and are
//! never mutated or deleted.

pub mod types;

pub use types::{TimelineEntry, TimelineEventKind};
