//! Project repository: cost aggregates, expenses, tasks, and progress.
//!
//! Cost fields are write-side aggregates maintained by increments at the
//! moment each contributing event occurs; they are only rebuilt by full
//! scan on explicit recalculation requests. Progress is the one pull-based
//! aggregate, recomputed by scanning tasks.

use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use fabrika_core::project::{
    CostBreakdown, CostComponent, Expense, ExpenseCategory, ExpenseStatus, Project, ProjectError,
    ProjectService, ProjectStatus, Task, TaskStatus,
};
use fabrika_core::timeline::{TimelineEntry, TimelineEventKind};
use fabrika_core::work_order::WorkOrder;
use fabrika_shared::RequestContext;
use fabrika_shared::types::{ExpenseId, ProjectId, TaskId};

use crate::store::{DocumentStore, Query, StoreError, query_with_fallback, run_transaction};

use super::timeline::TimelineRepository;
use super::{collections, decode};

/// Errors surfaced by the project repository.
#[derive(Debug, Error)]
pub enum ProjectRepositoryError {
    /// A project domain rule was violated.
    #[error(transparent)]
    Domain(#[from] ProjectError),

    /// The store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    /// Project name.
    pub name: String,
    /// Agreed sales price.
    pub sales_price: Decimal,
    /// Estimated total cost at quotation time.
    pub estimated_cost: Decimal,
}

/// Input for registering an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// The project the expense is charged to.
    pub project_id: ProjectId,
    /// Which cost component the amount routes into once approved.
    pub category: ExpenseCategory,
    /// The expense amount.
    pub amount: Decimal,
    /// What the expense was for.
    pub description: String,
}

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    /// The project the task belongs to.
    pub project_id: ProjectId,
    /// Task name.
    pub name: String,
    /// Progress weight; tasks without an estimate weigh 1.
    pub estimated_hours: Option<Decimal>,
}

/// Repository for projects and their aggregates.
#[derive(Clone)]
pub struct ProjectRepository {
    store: Arc<dyn DocumentStore>,
    timeline: TimelineRepository,
    max_attempts: u32,
}

impl ProjectRepository {
    /// Creates a new project repository.
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

    /// Creates a planned project with zeroed cost aggregates.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateProjectInput,
    ) -> Result<Project, ProjectRepositoryError> {
        let project = Project {
            id: ProjectId::new(),
            tenant_id: ctx.tenant_id,
            name: input.name,
            status: ProjectStatus::Planned,
            sales_price: input.sales_price,
            estimated_cost: input.estimated_cost,
            costs: CostBreakdown::default(),
            progress_percent: Decimal::ZERO,
            created_at: Utc::now(),
        };

        self.store
            .insert(
                collections::PROJECTS,
                serde_json::to_value(&project).map_err(StoreError::from)?,
            )
            .await?;

        info!(project_id = %project.id, "project created");
        Ok(project)
    }

    /// Fetches a project by id.
    pub async fn get(&self, id: ProjectId) -> Result<Option<Project>, ProjectRepositoryError> {
        let doc = self.store.get(collections::PROJECTS, &id.to_string()).await?;
        doc.map(decode).transpose().map_err(Into::into)
    }

    /// Changes a project's status.
    ///
    /// The status write and its timeline entry are committed together.
    pub async fn change_status(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        new_status: ProjectStatus,
        note: Option<String>,
    ) -> Result<Project, ProjectRepositoryError> {
        let ctx = *ctx;
        let project = run_transaction(self.store.as_ref(), self.max_attempts, move |txn| {
            let note = note.clone();
            async move {
                let mut project: Project = txn
                    .get(collections::PROJECTS, &project_id.to_string())
                    .await?
                    .ok_or(ProjectError::NotFound(project_id))?;

                project.status = new_status;

                let entry = TimelineEntry::new(
                    ctx.tenant_id,
                    project_id,
                    TimelineEventKind::StatusChange,
                    match &note {
                        Some(note) => format!("Project moved to {new_status:?}: {note}"),
                        None => format!("Project moved to {new_status:?}"),
                    },
                    ctx.user_id,
                );

                txn.set(collections::PROJECTS, &project_id.to_string(), &project)?;
                txn.set(
                    collections::PROJECT_TIMELINE,
                    &entry.id.to_string(),
                    &entry,
                )?;

                Ok::<_, ProjectRepositoryError>(project)
            }
            .boxed()
        })
        .await?;

        info!(%project_id, ?new_status, "project status changed");
        Ok(project)
    }

    /// Registers a pending expense.
    ///
    /// # Errors
    ///
    /// Fails with `ProjectError::NonPositiveExpenseAmount` for a bad amount
    /// and `ProjectError::NotFound` when the project does not exist.
    pub async fn add_expense(
        &self,
        ctx: &RequestContext,
        input: CreateExpenseInput,
    ) -> Result<Expense, ProjectRepositoryError> {
        if input.amount <= Decimal::ZERO {
            return Err(ProjectError::NonPositiveExpenseAmount.into());
        }
        self.get(input.project_id)
            .await?
            .ok_or(ProjectError::NotFound(input.project_id))?;

        let expense = Expense {
            id: ExpenseId::new(),
            tenant_id: ctx.tenant_id,
            project_id: input.project_id,
            category: input.category,
            amount: input.amount,
            status: ExpenseStatus::Pending,
            description: input.description,
            approved_by: None,
            created_at: Utc::now(),
        };

        self.store
            .insert(
                collections::EXPENSES,
                serde_json::to_value(&expense).map_err(StoreError::from)?,
            )
            .await?;

        info!(expense_id = %expense.id, amount = %expense.amount, "expense registered");
        Ok(expense)
    }

    /// Approves a pending expense, routing its amount into exactly one
    /// cost component plus `actual_cost` in one atomic commit.
    ///
    /// # Errors
    ///
    /// Fails with `ProjectError::ExpenseNotPending` unless the expense is
    /// pending.
    pub async fn approve_expense(
        &self,
        ctx: &RequestContext,
        expense_id: ExpenseId,
    ) -> Result<Expense, ProjectRepositoryError> {
        let ctx = *ctx;
        let expense = run_transaction(self.store.as_ref(), self.max_attempts, move |txn| {
            async move {
                let mut expense: Expense = txn
                    .get(collections::EXPENSES, &expense_id.to_string())
                    .await?
                    .ok_or(ProjectError::ExpenseNotFound(expense_id))?;
                ProjectService::validate_approval(&expense)?;

                // The project is read inside the transaction so approval
                // cannot race its deletion.
                let project: Project = txn
                    .get(collections::PROJECTS, &expense.project_id.to_string())
                    .await?
                    .ok_or(ProjectError::NotFound(expense.project_id))?;

                expense.status = ExpenseStatus::Approved;
                expense.approved_by = Some(ctx.user_id);

                let component = ProjectService::expense_target(expense.category);
                let project_id = project.id.to_string();

                txn.set(collections::EXPENSES, &expense_id.to_string(), &expense)?;
                txn.increment(
                    collections::PROJECTS,
                    &project_id,
                    component.field_name(),
                    expense.amount,
                );
                txn.increment(
                    collections::PROJECTS,
                    &project_id,
                    "actual_cost",
                    expense.amount,
                );

                Ok::<_, ProjectRepositoryError>(expense)
            }
            .boxed()
        })
        .await?;

        self.timeline
            .record(TimelineEntry::new(
                ctx.tenant_id,
                expense.project_id,
                TimelineEventKind::ExpenseApproved,
                format!("Approved expense '{}' (+{})", expense.description, expense.amount),
                ctx.user_id,
            ))
            .await;

        info!(%expense_id, amount = %expense.amount, "expense approved");
        Ok(expense)
    }

    /// Creates a task.
    pub async fn add_task(
        &self,
        ctx: &RequestContext,
        input: CreateTaskInput,
    ) -> Result<Task, ProjectRepositoryError> {
        self.get(input.project_id)
            .await?
            .ok_or(ProjectError::NotFound(input.project_id))?;

        let task = Task {
            id: TaskId::new(),
            tenant_id: ctx.tenant_id,
            project_id: input.project_id,
            name: input.name,
            status: TaskStatus::Todo,
            estimated_hours: input.estimated_hours,
            created_at: Utc::now(),
        };

        self.store
            .insert(
                collections::TASKS,
                serde_json::to_value(&task).map_err(StoreError::from)?,
            )
            .await?;
        Ok(task)
    }

    /// Updates a task's status.
    pub async fn set_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, ProjectRepositoryError> {
        let doc = self.store.get(collections::TASKS, &task_id.to_string()).await?;
        let mut task: Task = doc
            .map(decode)
            .transpose()?
            .ok_or(ProjectError::TaskNotFound(task_id))?;

        task.status = status;
        self.store
            .set(
                collections::TASKS,
                &task_id.to_string(),
                serde_json::to_value(&task).map_err(StoreError::from)?,
            )
            .await?;
        Ok(task)
    }

    /// Recomputes the task-weighted progress percentage by full scan.
    ///
    /// Pull-based on purpose: task completion is rare and the scan is
    /// cheap. With no tasks the stored percentage is left unchanged and
    /// `None` is returned.
    pub async fn calculate_progress(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> Result<Option<Decimal>, ProjectRepositoryError> {
        let query = Query::unfiltered()
            .filter("tenant_id", ctx.tenant_id.to_string())
            .filter("project_id", project_id.to_string());
        let docs = query_with_fallback(self.store.as_ref(), collections::TASKS, &query).await?;
        let tasks: Vec<Task> = docs.into_iter().map(decode).collect::<Result<_, _>>()?;

        let Some(percent) = ProjectService::progress_percent(&tasks) else {
            debug!(%project_id, "no tasks, progress left unchanged");
            return Ok(None);
        };

        let mut project = self
            .get(project_id)
            .await?
            .ok_or(ProjectError::NotFound(project_id))?;
        project.progress_percent = percent;
        self.store
            .set(
                collections::PROJECTS,
                &project_id.to_string(),
                serde_json::to_value(&project).map_err(StoreError::from)?,
            )
            .await?;

        debug!(%project_id, %percent, "project progress recomputed");
        Ok(Some(percent))
    }

    /// Rebuilds the cost aggregates from a full scan of work orders and
    /// approved expenses.
    ///
    /// This is the explicit recalculation request; the steady state never
    /// scans.
    pub async fn recalculate_costs(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> Result<Project, ProjectRepositoryError> {
        let mut project = self
            .get(project_id)
            .await?
            .ok_or(ProjectError::NotFound(project_id))?;

        let by_project = |collection: &'static str| {
            let query = Query::unfiltered()
                .filter("tenant_id", ctx.tenant_id.to_string())
                .filter("project_id", project_id.to_string());
            async move {
                query_with_fallback(self.store.as_ref(), collection, &query).await
            }
        };

        let work_orders: Vec<WorkOrder> = by_project(collections::WORK_ORDERS)
            .await?
            .into_iter()
            .map(decode)
            .collect::<Result<_, _>>()?;
        let expenses: Vec<Expense> = by_project(collections::EXPENSES)
            .await?
            .into_iter()
            .map(decode)
            .collect::<Result<_, _>>()?;

        let mut costs = CostBreakdown::default();
        for wo in &work_orders {
            let materials: Decimal = wo.materials.iter().map(|m| m.total_cost).sum();
            ProjectService::apply_cost_delta(&mut costs, CostComponent::Materials, materials);
            ProjectService::apply_cost_delta(
                &mut costs,
                CostComponent::Labor,
                wo.labor_hours * wo.labor_cost_per_hour,
            );
        }
        for expense in expenses.iter().filter(|e| e.status == ExpenseStatus::Approved) {
            ProjectService::apply_cost_delta(
                &mut costs,
                ProjectService::expense_target(expense.category),
                expense.amount,
            );
        }

        project.costs = costs;
        self.store
            .set(
                collections::PROJECTS,
                &project_id.to_string(),
                serde_json::to_value(&project).map_err(StoreError::from)?,
            )
            .await?;

        self.timeline
            .record(TimelineEntry::new(
                ctx.tenant_id,
                project_id,
                TimelineEventKind::CostsRecalculated,
                format!("Cost aggregates rebuilt (actual {})", project.costs.actual_cost),
                ctx.user_id,
            ))
            .await;

        info!(%project_id, actual_cost = %project.costs.actual_cost, "project costs recalculated");
        Ok(project)
    }
}
