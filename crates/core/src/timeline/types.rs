//! Timeline entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fabrika_shared::types::{ProjectId, TenantId, TimelineEntryId, UserId};

/// What kind of event a timeline entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    /// A project or work order status change.
    StatusChange,
    /// Material consumed on a work order.
    MaterialConsumed,
    /// Labor hours logged on a work order.
    LaborLogged,
    /// An expense approved into project costs.
    ExpenseApproved,
    /// Project progress recomputed from tasks.
    ProgressRecalculated,
    /// Project cost aggregates rebuilt from a full scan.
    CostsRecalculated,
}

/// One append-only audit record against a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// The entry ID.
    pub id: TimelineEntryId,
    /// The tenant the entry belongs to.
    pub tenant_id: TenantId,
    /// The project the entry describes.
    pub project_id: ProjectId,
    /// What kind of event happened.
    pub kind: TimelineEventKind,
    /// Human-readable description of the delta.
    pub description: String,
    /// The user who performed the action.
    pub actor: UserId,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

impl TimelineEntry {
    /// Creates a new entry stamped with the current time.
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        project_id: ProjectId,
        kind: TimelineEventKind,
        description: impl Into<String>,
        actor: UserId,
    ) -> Self {
        Self {
            id: TimelineEntryId::new(),
            tenant_id,
            project_id,
            kind,
            description: description.into(),
            actor,
            created_at: Utc::now(),
        }
    }
}
