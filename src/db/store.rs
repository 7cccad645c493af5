//! Record store contract shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::run_index::RunIdPageQuery;
use crate::error::AppResult;
use crate::models::{NewTestMethodResult, TestMethodResult, TestStatus};

/// Conjunctive equality filter. Run id and tenant are always part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFilter {
    pub run_id: String,
    pub iata: String,
    pub suite_type: Option<String>,
    pub feature_name: Option<String>,
    pub status: Option<TestStatus>,
}

impl ResultFilter {
    /// Every result of one run for one tenant.
    pub fn run(run_id: &str, iata: &str) -> Self {
        ResultFilter {
            run_id: run_id.to_string(),
            iata: iata.to_string(),
            suite_type: None,
            feature_name: None,
            status: None,
        }
    }

    pub fn with_suite_type(mut self, suite_type: &str) -> Self {
        self.suite_type = Some(suite_type.to_string());
        self
    }

    pub fn with_feature_name(mut self, feature_name: &str) -> Self {
        self.feature_name = Some(feature_name.to_string());
        self
    }

    pub fn with_status(mut self, status: TestStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether `record` satisfies every populated field.
    pub fn matches(&self, record: &TestMethodResult) -> bool {
        record.run_id == self.run_id
            && record.iata == self.iata
            && self
                .suite_type
                .as_ref()
                .is_none_or(|suite| &record.suite_type == suite)
            && self
                .feature_name
                .as_ref()
                .is_none_or(|feature| &record.feature_name == feature)
            && self.status.is_none_or(|status| record.status == status)
    }
}

/// Persistence backend for test method results.
///
/// Result order of [`ResultStore::find`] is store-native; both backends
/// return records in insertion order.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Store a new record and assign its id.
    async fn insert(&self, new: NewTestMethodResult) -> AppResult<TestMethodResult>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TestMethodResult>>;

    /// Overwrite every field of `id` except the id itself.
    /// Returns `None` when no record has that id.
    async fn replace(
        &self,
        id: Uuid,
        new: NewTestMethodResult,
    ) -> AppResult<Option<TestMethodResult>>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn find(&self, filter: &ResultFilter) -> AppResult<Vec<TestMethodResult>>;

    /// One page of distinct run ids, newest run first, in a single round trip.
    async fn run_id_page(&self, query: &RunIdPageQuery) -> AppResult<Vec<String>>;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> AppResult<()>;
}
