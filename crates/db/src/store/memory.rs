//! In-memory document store backend.
//!
//! Implements the full [`DocumentStore`] contract - versioned documents,
//! all-or-nothing commits, blind decimal increments, and a configurable
//! index set so tests can exercise the missing-index fallback path.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::query::{apply_client_side, Query};
use super::{DocumentStore, ReadStamp, StoreError, WriteOp};

#[derive(Debug, Clone)]
struct StoredDocument {
    value: Value,
    version: u64,
}

/// An in-memory `DocumentStore`.
///
/// A single `RwLock` over the whole document map gives commits the same
/// multi-document atomicity a managed store provides.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, HashMap<String, StoredDocument>>>,
    /// `None` means every field is indexed (the common case); `Some` lists
    /// the only (collection, field) pairs with an index.
    indexed_fields: Option<HashSet<(String, String)>>,
}

impl MemoryStore {
    /// Creates a store where every field is indexed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store where only the listed (collection, field) pairs are
    /// indexed; queries touching anything else fail with `IndexMissing`.
    #[must_use]
    pub fn with_indexes<'a>(indexes: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            indexed_fields: Some(
                indexes
                    .into_iter()
                    .map(|(c, f)| (c.to_string(), f.to_string()))
                    .collect(),
            ),
        }
    }

    fn check_indexes(&self, collection: &str, query: &Query) -> Result<(), StoreError> {
        let Some(indexed) = &self.indexed_fields else {
            return Ok(());
        };

        let mut fields: Vec<&str> = query.filters.iter().map(|f| f.field.as_str()).collect();
        if let Some((field, _)) = &query.order_by {
            fields.push(field);
        }

        for field in fields {
            if !indexed.contains(&(collection.to_string(), field.to_string())) {
                return Err(StoreError::IndexMissing {
                    collection: collection.to_string(),
                    detail: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Computes the post-increment value of a decimal field stored as a string.
fn incremented_field(
    doc: &StoredDocument,
    collection: &str,
    id: &str,
    field: &str,
    delta: Decimal,
) -> Result<Value, StoreError> {
    let invalid = || StoreError::InvalidIncrement {
        collection: collection.to_string(),
        id: id.to_string(),
        field: field.to_string(),
    };

    let current = match doc.value.get(field) {
        // Absent fields increment from zero.
        None | Some(Value::Null) => Decimal::ZERO,
        Some(Value::String(s)) => Decimal::from_str(s).map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    Ok(Value::String((current + delta).to_string()))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut value: Value) -> Result<String, StoreError> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map_or_else(|| Uuid::now_v7().to_string(), ToString::to_string);

        if let Some(obj) = value.as_object_mut() {
            obj.entry("id".to_string())
                .or_insert_with(|| Value::String(id.clone()));
            obj.entry("created_at".to_string())
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        }

        let mut inner = self.inner.write().await;
        let docs = inner.entry(collection.to_string()).or_default();
        let version = docs.get(&id).map_or(1, |d| d.version + 1);
        docs.insert(id.clone(), StoredDocument { value, version });
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .get_versioned(collection, id)
            .await?
            .map(|(value, _)| value))
    }

    async fn get_versioned(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<(Value, u64)>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| (doc.value.clone(), doc.version)))
    }

    async fn set(&self, collection: &str, id: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let docs = inner.entry(collection.to_string()).or_default();
        let version = docs.get(id).map_or(1, |d| d.version + 1);
        docs.insert(id.to_string(), StoredDocument { value, version });
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(docs) = inner.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.check_indexes(collection, query)?;

        let inner = self.inner.read().await;
        let docs: Vec<Value> = inner
            .get(collection)
            .map(|docs| docs.values().map(|d| d.value.clone()).collect())
            .unwrap_or_default();

        Ok(apply_client_side(docs, query))
    }

    async fn commit(&self, reads: &[ReadStamp], writes: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        // Validate every read stamp before touching anything.
        for stamp in reads {
            let current = inner
                .get(&stamp.collection)
                .and_then(|docs| docs.get(&stamp.id))
                .map(|d| d.version);
            if current != stamp.version {
                return Err(StoreError::WriteConflict {
                    collection: stamp.collection.clone(),
                    id: stamp.id.clone(),
                });
            }
        }

        // Stage all writes so a failing increment leaves nothing applied.
        let mut staged: HashMap<(String, String), Option<StoredDocument>> = HashMap::new();
        let lookup = |inner: &HashMap<String, HashMap<String, StoredDocument>>,
                      staged: &HashMap<(String, String), Option<StoredDocument>>,
                      collection: &str,
                      id: &str|
         -> Option<StoredDocument> {
            if let Some(entry) = staged.get(&(collection.to_string(), id.to_string())) {
                return entry.clone();
            }
            inner.get(collection).and_then(|docs| docs.get(id)).cloned()
        };

        for op in &writes {
            match op {
                WriteOp::Set { collection, id, value } => {
                    let version = lookup(&inner, &staged, collection, id).map_or(1, |d| d.version + 1);
                    staged.insert(
                        (collection.clone(), id.clone()),
                        Some(StoredDocument {
                            value: value.clone(),
                            version,
                        }),
                    );
                }
                WriteOp::Delete { collection, id } => {
                    staged.insert((collection.clone(), id.clone()), None);
                }
                WriteOp::Increment {
                    collection,
                    id,
                    field,
                    delta,
                } => {
                    let Some(mut doc) = lookup(&inner, &staged, collection, id) else {
                        return Err(StoreError::InvalidIncrement {
                            collection: collection.clone(),
                            id: id.clone(),
                            field: field.clone(),
                        });
                    };
                    let new_value = incremented_field(&doc, collection, id, field, *delta)?;
                    if let Some(obj) = doc.value.as_object_mut() {
                        obj.insert(field.clone(), new_value);
                    }
                    doc.version += 1;
                    staged.insert((collection.clone(), id.clone()), Some(doc));
                }
            }
        }

        // All ops validated; apply the staged state.
        for ((collection, id), entry) in staged {
            let docs = inner.entry(collection).or_default();
            match entry {
                Some(doc) => {
                    docs.insert(id, doc);
                }
                None => {
                    docs.remove(&id);
                }
            }
        }

        Ok(())
    }
}
