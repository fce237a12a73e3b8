//! Store error types.

use thiserror::Error;

/// Errors surfaced by the document store.
///
/// Infrastructure conditions (`IndexMissing`, `WriteConflict`,
/// `Unavailable`) are handled by fallbacks and retries at the data-access
/// boundary; they must never reach the end user as domain errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The query requires an index that does not exist.
    #[error("Missing index on {collection}: {detail}")]
    IndexMissing {
        /// The collection queried.
        collection: String,
        /// Which field combination lacks an index.
        detail: String,
    },

    /// A document read inside a transaction changed before commit.
    #[error("Write conflict on {collection}/{id}")]
    WriteConflict {
        /// The collection of the conflicting document.
        collection: String,
        /// The conflicting document id.
        id: String,
    },

    /// A transaction exhausted its retry budget on write conflicts.
    #[error("Transaction aborted after {attempts} attempts")]
    RetriesExhausted {
        /// How many attempts were made.
        attempts: u32,
    },

    /// An increment targeted a missing document or a non-decimal field.
    #[error("Cannot increment {collection}/{id} field {field}")]
    InvalidIncrement {
        /// The collection of the target document.
        collection: String,
        /// The target document id.
        id: String,
        /// The field that could not be incremented.
        field: String,
    },

    /// The stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The store is temporarily unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True for transient conditions the store layer retries or degrades
    /// around rather than surfacing.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::IndexMissing { .. } | Self::WriteConflict { .. } | Self::Unavailable(_)
        )
    }
}

impl From<StoreError> for fabrika_shared::AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WriteConflict { .. } | StoreError::RetriesExhausted { .. } => {
                Self::Conflict(err.to_string())
            }
            other => Self::Store(other.to_string()),
        }
    }
}
