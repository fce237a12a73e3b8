//! Shared fixtures for repository tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use fabrika_shared::RequestContext;
use fabrika_shared::types::{TenantId, UserId};

use crate::store::{DocumentStore, MemoryStore, Query, ReadStamp, StoreError, WriteOp};

use super::{
    LoanRepository, ProjectRepository, TimelineRepository, WorkOrderRepository,
    WorkPeriodRepository,
};

pub(super) const MAX_ATTEMPTS: u32 = 5;

/// Enables tracing output for tests run with `RUST_LOG` set.
pub(super) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// All repositories wired to one store, plus a request context.
pub(super) struct TestHarness {
    pub store: Arc<dyn DocumentStore>,
    pub ctx: RequestContext,
    pub periods: WorkPeriodRepository,
    pub loans: LoanRepository,
    pub timeline: TimelineRepository,
    pub work_orders: WorkOrderRepository,
    pub projects: ProjectRepository,
}

/// Builds a harness over a fully indexed in-memory store.
pub(super) fn harness() -> TestHarness {
    harness_with(Arc::new(MemoryStore::new()))
}

/// Builds a harness over the given store.
pub(super) fn harness_with(store: Arc<dyn DocumentStore>) -> TestHarness {
    let ctx = RequestContext::new(TenantId::new(), UserId::new());
    let periods = WorkPeriodRepository::new(Arc::clone(&store));
    let loans = LoanRepository::new(Arc::clone(&store), periods.clone(), MAX_ATTEMPTS);
    let timeline = TimelineRepository::new(Arc::clone(&store));
    let work_orders =
        WorkOrderRepository::new(Arc::clone(&store), timeline.clone(), MAX_ATTEMPTS);
    let projects = ProjectRepository::new(Arc::clone(&store), timeline.clone(), MAX_ATTEMPTS);

    TestHarness {
        store,
        ctx,
        periods,
        loans,
        timeline,
        work_orders,
        projects,
    }
}

/// A store that fails every insert into one collection.
///
/// Used to prove that audit-trail failures never abort or roll back the
/// primary mutation.
pub(super) struct FailingCollectionStore {
    inner: MemoryStore,
    failing: &'static str,
}

impl FailingCollectionStore {
    pub(super) fn new(failing: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing,
        }
    }
}

#[async_trait]
impl DocumentStore for FailingCollectionStore {
    async fn insert(&self, collection: &str, value: Value) -> Result<String, StoreError> {
        if collection == self.failing {
            return Err(StoreError::Unavailable(format!(
                "collection {collection} rejected for test"
            )));
        }
        self.inner.insert(collection, value).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn get_versioned(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<(Value, u64)>, StoreError> {
        self.inner.get_versioned(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(collection, id, value).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.inner.query(collection, query).await
    }

    async fn commit(&self, reads: &[ReadStamp], writes: Vec<WriteOp>) -> Result<(), StoreError> {
        self.inner.commit(reads, writes).await
    }
}
