//! Optimistic transactions over the document store.
//!
//! A [`Transaction`] records versioned reads and buffers writes; commit
//! validates every read against the live store and applies the writes
//! atomically. [`run_transaction`] re-invokes the body on write conflicts
//! up to an attempt budget. Domain errors returned by the body abort
//! immediately - they are terminal, not retryable.

use futures::future::BoxFuture;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{DocumentStore, ReadStamp, StoreError, WriteOp};

/// A handle for reads and buffered writes inside one transaction attempt.
pub struct Transaction<'s> {
    store: &'s dyn DocumentStore,
    reads: Vec<ReadStamp>,
    writes: Vec<WriteOp>,
}

impl<'s> Transaction<'s> {
    fn new(store: &'s dyn DocumentStore) -> Self {
        Self {
            store,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Reads a document, recording its version for commit-time validation.
    ///
    /// Absence is recorded too: the commit fails if a document read as
    /// absent has appeared in the meantime.
    pub async fn get<D: DeserializeOwned>(
        &mut self,
        collection: &str,
        id: &str,
    ) -> Result<Option<D>, StoreError> {
        match self.store.get_versioned(collection, id).await? {
            Some((value, version)) => {
                self.reads.push(ReadStamp {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    version: Some(version),
                });
                Ok(Some(serde_json::from_value(value)?))
            }
            None => {
                self.reads.push(ReadStamp {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    version: None,
                });
                Ok(None)
            }
        }
    }

    /// Buffers a full document write.
    pub fn set<D: Serialize>(
        &mut self,
        collection: &str,
        id: &str,
        doc: &D,
    ) -> Result<(), StoreError> {
        self.writes.push(WriteOp::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            value: serde_json::to_value(doc)?,
        });
        Ok(())
    }

    /// Buffers a document deletion.
    pub fn delete(&mut self, collection: &str, id: &str) {
        self.writes.push(WriteOp::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
    }

    /// Buffers a blind decimal increment on a top-level field.
    pub fn increment(&mut self, collection: &str, id: &str, field: &str, delta: Decimal) {
        self.writes.push(WriteOp::Increment {
            collection: collection.to_string(),
            id: id.to_string(),
            field: field.to_string(),
            delta,
        });
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.store.commit(&self.reads, self.writes).await
    }
}

/// Runs `body` inside an optimistic transaction, retrying on write
/// conflicts up to `max_attempts`.
///
/// The body's own errors (domain validation, business rules) propagate on
/// the first occurrence and are never retried; only commit-time write
/// conflicts re-invoke the body against a fresh snapshot.
///
/// # Errors
///
/// Returns the body's error unchanged, or `StoreError::RetriesExhausted`
/// (converted into `E`) when the attempt budget runs out.
pub async fn run_transaction<'s, T, E, F>(
    store: &'s dyn DocumentStore,
    max_attempts: u32,
    mut body: F,
) -> Result<T, E>
where
    E: From<StoreError>,
    F: for<'t> FnMut(&'t mut Transaction<'s>) -> BoxFuture<'t, Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let mut txn = Transaction::new(store);
        let out = body(&mut txn).await?;

        match txn.commit().await {
            Ok(()) => {
                if attempt > 1 {
                    debug!(attempt, "transaction committed after retry");
                }
                return Ok(out);
            }
            Err(StoreError::WriteConflict { collection, id }) if attempt < max_attempts => {
                warn!(collection, id, attempt, "write conflict, retrying transaction");
            }
            Err(StoreError::WriteConflict { .. }) => {
                return Err(StoreError::RetriesExhausted {
                    attempts: max_attempts,
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        }
    }

    unreachable!("transaction loop always returns within the attempt budget")
}
