//! Timeline repository for the append-only audit trail.

use std::sync::Arc;

use tracing::warn;

use fabrika_core::timeline::TimelineEntry;
use fabrika_shared::RequestContext;
use fabrika_shared::types::ProjectId;

use crate::store::{Direction, DocumentStore, Query, StoreError, query_with_fallback};

use super::{collections, decode};

/// Repository for append-only project timeline entries.
#[derive(Clone)]
pub struct TimelineRepository {
    store: Arc<dyn DocumentStore>,
}

impl TimelineRepository {
    /// Creates a new timeline repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Appends a timeline entry, best-effort.
    ///
    /// Audit writes are fire-and-forget: a failure is logged and swallowed
    /// so it can never abort or roll back the mutation it describes.
    pub async fn record(&self, entry: TimelineEntry) {
        let value = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, project_id = %entry.project_id, "timeline entry not serializable, dropping");
                return;
            }
        };

        if let Err(e) = self.store.insert(collections::PROJECT_TIMELINE, value).await {
            warn!(error = %e, project_id = %entry.project_id, "timeline append failed, continuing");
        }
    }

    /// Lists a project's timeline, newest first.
    pub async fn for_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> Result<Vec<TimelineEntry>, StoreError> {
        let query = Query::unfiltered()
            .filter("tenant_id", ctx.tenant_id.to_string())
            .filter("project_id", project_id.to_string())
            .order_by("created_at", Direction::Descending);

        let docs =
            query_with_fallback(self.store.as_ref(), collections::PROJECT_TIMELINE, &query).await?;
        docs.into_iter().map(decode).collect()
    }
}
