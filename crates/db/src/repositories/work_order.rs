//! Work order repository: material consumption, labor, and status.
//!
//! Every balance-affecting event runs inside an atomic transaction that
//! re-reads the work order, validates against the fresh read, and commits
//! the work order update together with blind increments on the parent
//! project's cost aggregates. Timeline entries are appended after the
//! commit and never roll it back.

use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use fabrika_core::timeline::{TimelineEntry, TimelineEventKind};
use fabrika_core::work_order::{
    WorkOrder, WorkOrderError, WorkOrderMaterial, WorkOrderService, WorkOrderStatus,
};
use fabrika_shared::RequestContext;
use fabrika_shared::types::{ProjectId, RawMaterialId, WorkOrderId};

use crate::store::{DocumentStore, StoreError, run_transaction};

use super::timeline::TimelineRepository;
use super::{collections, decode};

/// Errors surfaced by the work order repository.
#[derive(Debug, Error)]
pub enum WorkOrderRepositoryError {
    /// A work order domain rule was violated.
    #[error(transparent)]
    Domain(#[from] WorkOrderError),

    /// The store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// One material requirement when creating a work order.
#[derive(Debug, Clone)]
pub struct MaterialRequirement {
    /// The raw material.
    pub raw_material_id: RawMaterialId,
    /// Quantity ceiling for the line.
    pub quantity_required: Decimal,
    /// Cost per unit.
    pub unit_cost: Decimal,
}

/// Input for creating a work order.
#[derive(Debug, Clone)]
pub struct CreateWorkOrderInput {
    /// The parent project.
    pub project_id: ProjectId,
    /// Short description of the phase.
    pub name: String,
    /// Material requirement lines.
    pub materials: Vec<MaterialRequirement>,
    /// Labor rate applied to logged hours.
    pub labor_cost_per_hour: Decimal,
}

/// Repository for work orders.
#[derive(Clone)]
pub struct WorkOrderRepository {
    store: Arc<dyn DocumentStore>,
    timeline: TimelineRepository,
    max_attempts: u32,
}

impl WorkOrderRepository {
    /// Creates a new work order repository.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        timeline: TimelineRepository,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            timeline,
            max_attempts,
        }
    }

    /// Creates a pending work order with unused material lines.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateWorkOrderInput,
    ) -> Result<WorkOrder, WorkOrderRepositoryError> {
        let work_order = WorkOrder {
            id: WorkOrderId::new(),
            tenant_id: ctx.tenant_id,
            project_id: input.project_id,
            name: input.name,
            status: WorkOrderStatus::Pending,
            materials: input
                .materials
                .into_iter()
                .map(|m| WorkOrderMaterial::new(m.raw_material_id, m.quantity_required, m.unit_cost))
                .collect(),
            labor_hours: Decimal::ZERO,
            labor_cost_per_hour: input.labor_cost_per_hour,
            actual_cost: Decimal::ZERO,
            progress_percent: Decimal::ZERO,
            actual_start_date: None,
            actual_end_date: None,
            created_at: Utc::now(),
        };

        self.store
            .insert(
                collections::WORK_ORDERS,
                serde_json::to_value(&work_order).map_err(StoreError::from)?,
            )
            .await?;

        info!(work_order_id = %work_order.id, project_id = %work_order.project_id, "work order created");
        Ok(work_order)
    }

    /// Fetches a work order by id.
    pub async fn get(&self, id: WorkOrderId) -> Result<Option<WorkOrder>, WorkOrderRepositoryError> {
        let doc = self.store.get(collections::WORK_ORDERS, &id.to_string()).await?;
        doc.map(decode).transpose().map_err(Into::into)
    }

    /// Records material consumption and rolls the cost delta up to the
    /// project.
    ///
    /// The consumption, the work order's recomputed `actual_cost`, and the
    /// project's `materials_cost`/`actual_cost` increments commit in one
    /// atomic step. A consumption that would exceed the line's requirement
    /// is rejected whole - no clamping, no partial write.
    ///
    /// # Errors
    ///
    /// Fails with `WorkOrderError::MaterialNotFound` when the line does not
    /// exist and `WorkOrderError::QuantityOverrun` on overconsumption.
    pub async fn record_material_consumption(
        &self,
        ctx: &RequestContext,
        work_order_id: WorkOrderId,
        raw_material_id: RawMaterialId,
        quantity: Decimal,
    ) -> Result<WorkOrder, WorkOrderRepositoryError> {
        let (work_order, cost_delta) =
            run_transaction(self.store.as_ref(), self.max_attempts, move |txn| {
                async move {
                    let mut work_order: WorkOrder = txn
                        .get(collections::WORK_ORDERS, &work_order_id.to_string())
                        .await?
                        .ok_or(WorkOrderError::NotFound(work_order_id))?;

                    let line = work_order
                        .materials
                        .iter_mut()
                        .find(|m| m.raw_material_id == raw_material_id)
                        .ok_or(WorkOrderError::MaterialNotFound {
                            work_order_id,
                            raw_material_id,
                        })?;

                    let consumption = WorkOrderService::consume_material(line, quantity)?;
                    line.quantity_used = consumption.new_quantity_used;
                    line.total_cost = consumption.new_total_cost;

                    work_order.actual_cost = WorkOrderService::actual_cost(
                        &work_order.materials,
                        work_order.labor_hours,
                        work_order.labor_cost_per_hour,
                    );

                    txn.set(
                        collections::WORK_ORDERS,
                        &work_order_id.to_string(),
                        &work_order,
                    )?;

                    // Only the incremental cost reaches the project, as blind
                    // increments that tolerate concurrent writers.
                    let project_id = work_order.project_id.to_string();
                    txn.increment(
                        collections::PROJECTS,
                        &project_id,
                        "materials_cost",
                        consumption.cost_delta,
                    );
                    txn.increment(
                        collections::PROJECTS,
                        &project_id,
                        "actual_cost",
                        consumption.cost_delta,
                    );

                    Ok::<_, WorkOrderRepositoryError>((work_order, consumption.cost_delta))
                }
                .boxed()
            })
            .await?;

        self.timeline
            .record(TimelineEntry::new(
                ctx.tenant_id,
                work_order.project_id,
                TimelineEventKind::MaterialConsumed,
                format!(
                    "Consumed {quantity} units on work order '{}' (+{cost_delta})",
                    work_order.name
                ),
                ctx.user_id,
            ))
            .await;

        info!(%work_order_id, %quantity, %cost_delta, "material consumption recorded");
        Ok(work_order)
    }

    /// Logs labor hours and rolls the labor cost up to the project.
    ///
    /// # Errors
    ///
    /// Fails with `WorkOrderError::NonPositiveHours` or
    /// `WorkOrderError::HoursAboveSessionCap` on bad input.
    pub async fn record_labor_hours(
        &self,
        ctx: &RequestContext,
        work_order_id: WorkOrderId,
        hours: Decimal,
        notes: Option<String>,
    ) -> Result<WorkOrder, WorkOrderRepositoryError> {
        WorkOrderService::validate_labor_hours(hours)?;

        let (work_order, cost_delta) =
            run_transaction(self.store.as_ref(), self.max_attempts, move |txn| {
                async move {
                    let mut work_order: WorkOrder = txn
                        .get(collections::WORK_ORDERS, &work_order_id.to_string())
                        .await?
                        .ok_or(WorkOrderError::NotFound(work_order_id))?;

                    work_order.labor_hours += hours;
                    work_order.actual_cost = WorkOrderService::actual_cost(
                        &work_order.materials,
                        work_order.labor_hours,
                        work_order.labor_cost_per_hour,
                    );

                    let cost_delta = hours * work_order.labor_cost_per_hour;

                    txn.set(
                        collections::WORK_ORDERS,
                        &work_order_id.to_string(),
                        &work_order,
                    )?;

                    let project_id = work_order.project_id.to_string();
                    txn.increment(collections::PROJECTS, &project_id, "labor_cost", cost_delta);
                    txn.increment(collections::PROJECTS, &project_id, "actual_cost", cost_delta);

                    Ok::<_, WorkOrderRepositoryError>((work_order, cost_delta))
                }
                .boxed()
            })
            .await?;

        self.timeline
            .record(TimelineEntry::new(
                ctx.tenant_id,
                work_order.project_id,
                TimelineEventKind::LaborLogged,
                match &notes {
                    Some(notes) => format!(
                        "Logged {hours}h on work order '{}' (+{cost_delta}): {notes}",
                        work_order.name
                    ),
                    None => format!(
                        "Logged {hours}h on work order '{}' (+{cost_delta})",
                        work_order.name
                    ),
                },
                ctx.user_id,
            ))
            .await;

        info!(%work_order_id, %hours, %cost_delta, "labor hours recorded");
        Ok(work_order)
    }

    /// Changes a work order's status with its mandatory side effects.
    ///
    /// The first transition into `InProgress` stamps the actual start;
    /// entering `Completed` stamps the actual end and forces progress to
    /// 100%.
    ///
    /// # Errors
    ///
    /// Fails with `WorkOrderError::TerminalStatus` when the work order is
    /// already completed or cancelled.
    pub async fn change_status(
        &self,
        ctx: &RequestContext,
        work_order_id: WorkOrderId,
        new_status: WorkOrderStatus,
        note: Option<String>,
    ) -> Result<WorkOrder, WorkOrderRepositoryError> {
        let now = Utc::now();

        let work_order = run_transaction(self.store.as_ref(), self.max_attempts, move |txn| {
            async move {
                let mut work_order: WorkOrder = txn
                    .get(collections::WORK_ORDERS, &work_order_id.to_string())
                    .await?
                    .ok_or(WorkOrderError::NotFound(work_order_id))?;

                let change = WorkOrderService::change_status(&work_order, new_status, now)?;
                work_order.status = change.status;
                if let Some(started) = change.stamp_start {
                    work_order.actual_start_date = Some(started);
                }
                if let Some(ended) = change.stamp_end {
                    work_order.actual_end_date = Some(ended);
                }
                if let Some(progress) = change.force_progress {
                    work_order.progress_percent = progress;
                }

                txn.set(
                    collections::WORK_ORDERS,
                    &work_order_id.to_string(),
                    &work_order,
                )?;

                Ok::<_, WorkOrderRepositoryError>(work_order)
            }
            .boxed()
        })
        .await?;

        self.timeline
            .record(TimelineEntry::new(
                ctx.tenant_id,
                work_order.project_id,
                TimelineEventKind::StatusChange,
                match &note {
                    Some(note) => {
                        format!("Work order '{}' moved to {new_status:?}: {note}", work_order.name)
                    }
                    None => format!("Work order '{}' moved to {new_status:?}", work_order.name),
                },
                ctx.user_id,
            ))
            .await;

        info!(%work_order_id, ?new_status, "work order status changed");
        Ok(work_order)
    }
}
