//! Document-store abstraction.
//!
//! The engine talks to its database exclusively through the
//! [`DocumentStore`] trait: point reads with not-found as a first-class
//! outcome, filtered/ordered queries, atomic multi-document commits with
//! optimistic read validation, and field-level numeric increments. The
//! in-memory backend in [`memory`] implements the same contract a managed
//! document database would.

pub mod error;
pub mod memory;
pub mod query;
pub mod txn;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use query::{Direction, Filter, Query, query_with_fallback};
pub use txn::{Transaction, run_transaction};

/// A versioned read recorded by a transaction.
///
/// `version` is `None` when the document was absent at read time; the
/// commit then fails if the document has appeared since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadStamp {
    /// The collection read from.
    pub collection: String,
    /// The document id.
    pub id: String,
    /// The version observed, or `None` for an absent document.
    pub version: Option<u64>,
}

/// A buffered write applied atomically at commit time.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Replace (or create) the document.
    Set {
        /// The collection written to.
        collection: String,
        /// The document id.
        id: String,
        /// The full document value.
        value: Value,
    },
    /// Remove the document.
    Delete {
        /// The collection written to.
        collection: String,
        /// The document id.
        id: String,
    },
    /// Add a decimal delta to a numeric field without read-modify-write.
    ///
    /// Increments are blind: they carry no read stamp, so concurrent
    /// incrementers never conflict with each other.
    Increment {
        /// The collection written to.
        collection: String,
        /// The document id.
        id: String,
        /// The top-level field holding the decimal.
        field: String,
        /// The delta to add.
        delta: Decimal,
    },
}

/// The document store the engine runs against.
///
/// Implementations must provide snapshot-consistent versioned reads and
/// all-or-nothing commits; everything else in this crate is built on top.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document, assigning an id and creation timestamp when the
    /// value does not already carry them. Returns the id.
    async fn insert(&self, collection: &str, value: Value) -> Result<String, StoreError>;

    /// Point read. Absent documents are `Ok(None)`, not an error.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Point read returning the document's current version for optimistic
    /// concurrency.
    async fn get_versioned(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<(Value, u64)>, StoreError>;

    /// Replaces (or creates) a document.
    async fn set(&self, collection: &str, id: &str, value: Value) -> Result<(), StoreError>;

    /// Deletes a document. Deleting an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Runs an equality-filtered, optionally ordered query.
    ///
    /// Fails with `StoreError::IndexMissing` when the backing index does
    /// not exist; callers that can tolerate degraded reads should go
    /// through [`query_with_fallback`].
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Atomically validates `reads` and applies `writes`.
    ///
    /// Fails with `StoreError::WriteConflict` when any read document has
    /// changed since it was stamped; nothing is applied in that case.
    async fn commit(&self, reads: &[ReadStamp], writes: Vec<WriteOp>) -> Result<(), StoreError>;
}
