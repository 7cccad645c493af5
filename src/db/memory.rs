//! Process-local record store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::run_index::{self, RunIdPageQuery};
use crate::db::store::{ResultFilter, ResultStore};
use crate::error::AppResult;
use crate::models::{NewTestMethodResult, TestMethodResult};

/// Keeps records in insertion order behind a read/write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<TestMethodResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn insert(&self, new: NewTestMethodResult) -> AppResult<TestMethodResult> {
        // UUIDv7 is time-ordered
        let record = TestMethodResult::from_new(Uuid::now_v7(), new);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TestMethodResult>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn replace(
        &self,
        id: Uuid,
        new: NewTestMethodResult,
    ) -> AppResult<Option<TestMethodResult>> {
        let mut records = self.records.write().await;
        let Some(slot) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        *slot = TestMethodResult::from_new(id, new);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    async fn find(&self, filter: &ResultFilter) -> AppResult<Vec<TestMethodResult>> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn run_id_page(&self, query: &RunIdPageQuery) -> AppResult<Vec<String>> {
        let records = self.records.read().await;
        Ok(run_index::page_run_ids(records.iter(), query))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
