//! Test result service: validation, tenant scoping, and not-found rules.

use std::num::NonZeroU32;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{ResultRepository, ResultStore, RunIdPageQuery};
use crate::error::{AppError, AppResult};
use crate::models::{NewTestMethodResult, RunIdPage, TestMethodResult, TestStatus};

/// Business operations behind the `/api/{iata}/test-results` routes.
#[derive(Clone)]
pub struct TestResultService {
    repository: ResultRepository,
    run_ids_page_size: NonZeroU32,
}

impl TestResultService {
    pub fn new(store: Arc<dyn ResultStore>, run_ids_page_size: NonZeroU32) -> Self {
        TestResultService {
            repository: ResultRepository::new(store),
            run_ids_page_size,
        }
    }

    /// Validate and store a new result.
    pub async fn create(&self, new: NewTestMethodResult) -> AppResult<TestMethodResult> {
        validate(&new)?;

        let saved = self.repository.save(new).await?;
        info!(
            "Stored test result id={} iata={} runId={} status={}",
            saved.id, saved.iata, saved.run_id, saved.status
        );

        Ok(saved)
    }

    /// All results of a run, optionally narrowed by status.
    ///
    /// An unknown run is NotFound unless a status filter was given, in which
    /// case an empty list is returned.
    pub async fn results_for_run(
        &self,
        run_id: &str,
        iata: &str,
        status: Option<TestStatus>,
    ) -> AppResult<Vec<TestMethodResult>> {
        if let Some(status) = status {
            return self.repository.by_run_and_status(run_id, status, iata).await;
        }

        let results = self.repository.by_run(run_id, iata).await?;
        if results.is_empty() {
            return Err(AppError::NotFound(format!(
                "Run id not found: {}, iata={}",
                run_id, iata
            )));
        }

        Ok(results)
    }

    pub async fn results_for_suite(
        &self,
        run_id: &str,
        suite_type: &str,
        iata: &str,
        status: Option<TestStatus>,
    ) -> AppResult<Vec<TestMethodResult>> {
        if let Some(status) = status {
            return self
                .repository
                .by_run_and_suite_and_status(run_id, suite_type, status, iata)
                .await;
        }

        let results = self
            .repository
            .by_run_and_suite(run_id, suite_type, iata)
            .await?;
        if results.is_empty() {
            return Err(AppError::NotFound(format!(
                "No results for runId={}, suiteType={}, iata={}",
                run_id, suite_type, iata
            )));
        }

        Ok(results)
    }

    pub async fn results_for_feature(
        &self,
        run_id: &str,
        feature_name: &str,
        iata: &str,
        status: Option<TestStatus>,
    ) -> AppResult<Vec<TestMethodResult>> {
        if let Some(status) = status {
            return self
                .repository
                .by_run_and_feature_and_status(run_id, feature_name, status, iata)
                .await;
        }

        let results = self
            .repository
            .by_run_and_feature(run_id, feature_name, iata)
            .await?;
        if results.is_empty() {
            return Err(AppError::NotFound(format!(
                "No results for runId={}, featureName={}, iata={}",
                run_id, feature_name, iata
            )));
        }

        Ok(results)
    }

    /// One page of the tenant's distinct run ids, newest first.
    pub async fn run_ids(&self, iata: &str, page: i64) -> AppResult<RunIdPage> {
        let query = RunIdPageQuery::new(iata, page, self.run_ids_page_size)?;
        let run_ids = self.repository.run_id_page(&query).await?;
        debug!(
            "Run id page iata={} page={} returned {} run(s)",
            iata,
            query.page(),
            run_ids.len()
        );

        Ok(RunIdPage {
            page: query.page(),
            size: query.page_size().get(),
            run_ids,
        })
    }

    /// Fetch one record owned by `iata`.
    pub async fn get(&self, iata: &str, id: Uuid) -> AppResult<TestMethodResult> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|record| record.iata == iata)
            .ok_or_else(|| not_found(id))
    }

    /// Replace every field of an existing record; the id is preserved.
    pub async fn update(
        &self,
        iata: &str,
        id: Uuid,
        new: NewTestMethodResult,
    ) -> AppResult<TestMethodResult> {
        self.get(iata, id).await?;
        validate(&new)?;

        let updated = self
            .repository
            .replace(id, new)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!("Replaced test result id={} iata={}", id, iata);

        Ok(updated)
    }

    pub async fn delete(&self, iata: &str, id: Uuid) -> AppResult<()> {
        self.get(iata, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted test result id={} iata={}", id, iata);

        Ok(())
    }

    /// Round-trip to the store for the readiness probe.
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Test result not found with id: {}", id))
}

fn validate(new: &NewTestMethodResult) -> AppResult<()> {
    if new.iata.trim().is_empty() {
        return Err(AppError::InvalidInput("iata must not be empty".to_string()));
    }
    if new.run_id.trim().is_empty() {
        return Err(AppError::InvalidInput("runId must not be empty".to_string()));
    }
    if new.end_time < new.start_time {
        return Err(AppError::InvalidInput(
            "endTime must not be before startTime".to_string(),
        ));
    }
    if i64::try_from(new.duration_ms).is_err() {
        return Err(AppError::InvalidInput(format!(
            "durationMs {} is out of range",
            new.duration_ms
        )));
    }
    if let Some(field) = field_with_nul(new) {
        return Err(AppError::InvalidInput(format!(
            "{} must not contain NUL characters",
            field
        )));
    }
    Ok(())
}

/// PostgreSQL text and jsonb values cannot hold U+0000.
fn field_with_nul(new: &NewTestMethodResult) -> Option<&'static str> {
    fn has_nul(value: &str) -> bool {
        value.contains('\0')
    }
    fn any_nul(values: &Option<Vec<String>>) -> bool {
        values.iter().flatten().any(|value| has_nul(value))
    }
    fn opt_nul(value: &Option<String>) -> bool {
        value.as_deref().is_some_and(has_nul)
    }

    let scalars = [
        ("runId", new.run_id.as_str()),
        ("iata", new.iata.as_str()),
        ("suiteType", new.suite_type.as_str()),
        ("featureName", new.feature_name.as_str()),
        ("methodName", new.method_name.as_str()),
        ("className", new.class_name.as_str()),
    ];
    if let Some((field, _)) = scalars.iter().find(|(_, value)| has_nul(value)) {
        return Some(*field);
    }

    if any_nul(&new.jira_test_cases) {
        return Some("jiraTestCases");
    }
    if any_nul(&new.logs) {
        return Some("logs");
    }
    if any_nul(&new.screenshot_urls) {
        return Some("screenshotUrls");
    }
    if let Some(env) = &new.environment {
        let fields = [
            &env.name,
            &env.browser,
            &env.browser_version,
            &env.os,
            &env.build_number,
        ];
        if fields.into_iter().any(opt_nul) {
            return Some("environment");
        }
    }
    let failure_has_nul = new.failures.iter().flatten().any(|failure| {
        opt_nul(&failure.error_message)
            || opt_nul(&failure.stack_trace)
            || opt_nul(&failure.screenshot_url)
            || any_nul(&failure.logs)
    });
    if failure_has_nul {
        return Some("failures");
    }

    None
}
