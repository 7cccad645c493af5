//! Named query operations over a [`ResultStore`].

use std::sync::Arc;

use uuid::Uuid;

use crate::db::run_index::RunIdPageQuery;
use crate::db::store::{ResultFilter, ResultStore};
use crate::error::AppResult;
use crate::models::{NewTestMethodResult, TestMethodResult, TestStatus};

/// Query facade used by the service layer. Every lookup is tenant-scoped.
#[derive(Clone)]
pub struct ResultRepository {
    store: Arc<dyn ResultStore>,
}

impl ResultRepository {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        ResultRepository { store }
    }

    pub async fn by_run(&self, run_id: &str, iata: &str) -> AppResult<Vec<TestMethodResult>> {
        self.store.find(&ResultFilter::run(run_id, iata)).await
    }

    pub async fn by_run_and_suite(
        &self,
        run_id: &str,
        suite_type: &str,
        iata: &str,
    ) -> AppResult<Vec<TestMethodResult>> {
        let filter = ResultFilter::run(run_id, iata).with_suite_type(suite_type);
        self.store.find(&filter).await
    }

    pub async fn by_run_and_suite_and_status(
        &self,
        run_id: &str,
        suite_type: &str,
        status: TestStatus,
        iata: &str,
    ) -> AppResult<Vec<TestMethodResult>> {
        let filter = ResultFilter::run(run_id, iata)
            .with_suite_type(suite_type)
            .with_status(status);
        self.store.find(&filter).await
    }

    pub async fn by_run_and_feature(
        &self,
        run_id: &str,
        feature_name: &str,
        iata: &str,
    ) -> AppResult<Vec<TestMethodResult>> {
        let filter = ResultFilter::run(run_id, iata).with_feature_name(feature_name);
        self.store.find(&filter).await
    }

    pub async fn by_run_and_feature_and_status(
        &self,
        run_id: &str,
        feature_name: &str,
        status: TestStatus,
        iata: &str,
    ) -> AppResult<Vec<TestMethodResult>> {
        let filter = ResultFilter::run(run_id, iata)
            .with_feature_name(feature_name)
            .with_status(status);
        self.store.find(&filter).await
    }

    pub async fn by_run_and_status(
        &self,
        run_id: &str,
        status: TestStatus,
        iata: &str,
    ) -> AppResult<Vec<TestMethodResult>> {
        let filter = ResultFilter::run(run_id, iata).with_status(status);
        self.store.find(&filter).await
    }

    pub async fn run_id_page(&self, query: &RunIdPageQuery) -> AppResult<Vec<String>> {
        self.store.run_id_page(query).await
    }

    pub async fn save(&self, new: NewTestMethodResult) -> AppResult<TestMethodResult> {
        self.store.insert(new).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TestMethodResult>> {
        self.store.find_by_id(id).await
    }

    pub async fn replace(
        &self,
        id: Uuid,
        new: NewTestMethodResult,
    ) -> AppResult<Option<TestMethodResult>> {
        self.store.replace(id, new).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.store.delete(id).await
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}
