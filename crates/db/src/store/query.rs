//! Query types and the two-tier indexed/fallback strategy.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::warn;

use super::{DocumentStore, StoreError};

/// Sort direction for an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// An equality filter on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// The field to compare.
    pub field: String,
    /// The value the field must equal.
    pub value: Value,
}

/// An equality-filtered, optionally ordered query.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Equality filters, all of which must match.
    pub filters: Vec<Filter>,
    /// Optional sort key.
    pub order_by: Option<(String, Direction)>,
}

impl Query {
    /// An unfiltered, unordered query (full collection fetch).
    #[must_use]
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }
}

/// Runs a query, degrading to a full fetch with client-side filtering and
/// sorting when the backing index is missing.
///
/// Only `StoreError::IndexMissing` triggers the fallback; any other error
/// propagates. The fallback produces the same result set as the indexed
/// tier, just without the store doing the work.
pub async fn query_with_fallback(
    store: &dyn DocumentStore,
    collection: &str,
    query: &Query,
) -> Result<Vec<Value>, StoreError> {
    match store.query(collection, query).await {
        Ok(docs) => Ok(docs),
        Err(StoreError::IndexMissing { detail, .. }) => {
            warn!(collection, detail, "index missing, using client-side filter and sort");
            let all = store.query(collection, &Query::unfiltered()).await?;
            Ok(apply_client_side(all, query))
        }
        Err(e) => Err(e),
    }
}

/// Applies a query's filters and sort to an already-fetched document set.
#[must_use]
pub fn apply_client_side(docs: Vec<Value>, query: &Query) -> Vec<Value> {
    let mut matched: Vec<Value> = docs
        .into_iter()
        .filter(|doc| matches_filters(doc, &query.filters))
        .collect();

    if let Some((field, direction)) = &query.order_by {
        sort_by_field(&mut matched, field, *direction);
    }

    matched
}

/// True if every filter matches the document.
#[must_use]
pub fn matches_filters(doc: &Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| doc.get(&f.field) == Some(&f.value))
}

/// Sorts documents by a top-level field.
pub fn sort_by_field(docs: &mut [Value], field: &str, direction: Direction) {
    docs.sort_by(|a, b| {
        let ord = compare_values(a.get(field), b.get(field));
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
}

/// Total order over optional JSON values, for sorting.
///
/// Absent fields sort first. Timestamps and dates are stored as RFC 3339 /
/// ISO 8601 strings, so lexicographic string comparison orders them
/// chronologically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
