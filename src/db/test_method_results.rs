//! PostgreSQL record store for test method results.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, QueryOrder, Set, Statement,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::entity::test_method_result::{
    self, ActiveModel as TestMethodResultActiveModel, Column, Entity as TestMethodResultEntity,
};
use crate::error::{AppError, AppResult};
use crate::models::{AssertType, NewTestMethodResult, TestMethodResult, TestStatus};

use super::DbPool;
use super::run_index::RunIdPageQuery;
use super::store::{ResultFilter, ResultStore};

#[derive(Debug, FromQueryResult)]
struct RunIdRow {
    run_id: String,
}

/// Encode an optional nested document; `None` stays SQL NULL.
fn to_document<T: Serialize>(value: &Option<T>) -> AppResult<Option<JsonValue>> {
    value
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))
}

fn from_document<T: DeserializeOwned>(
    id: Uuid,
    column: &str,
    value: Option<JsonValue>,
) -> AppResult<Option<T>> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AppError::Database(format!("Corrupt {} on test result {}: {}", column, id, e)))
}

fn duration_column(duration_ms: u64) -> AppResult<i64> {
    i64::try_from(duration_ms)
        .map_err(|_| AppError::InvalidInput(format!("durationMs {} is out of range", duration_ms)))
}

/// Copy every domain field onto `model`, leaving id and created_at alone.
fn apply_fields(
    model: &mut TestMethodResultActiveModel,
    new: &NewTestMethodResult,
) -> AppResult<()> {
    model.run_id = Set(new.run_id.clone());
    model.iata = Set(new.iata.clone());
    model.suite_type = Set(new.suite_type.clone());
    model.feature_name = Set(new.feature_name.clone());
    model.method_name = Set(new.method_name.clone());
    model.class_name = Set(new.class_name.clone());
    model.status = Set(new.status.as_str().to_string());
    model.assert_type = Set(new.assert_type.as_str().to_string());
    model.start_time = Set(new.start_time);
    model.end_time = Set(new.end_time);
    model.duration_ms = Set(duration_column(new.duration_ms)?);
    model.jira_test_cases = Set(to_document(&new.jira_test_cases)?);
    model.environment = Set(to_document(&new.environment)?);
    model.logs = Set(to_document(&new.logs)?);
    model.screenshot_urls = Set(to_document(&new.screenshot_urls)?);
    model.failures = Set(to_document(&new.failures)?);
    model.updated_at = Set(Utc::now());
    Ok(())
}

/// Convert a stored row back into the domain record.
fn into_record(model: test_method_result::Model) -> AppResult<TestMethodResult> {
    let id = model.id;
    let status = TestStatus::parse(&model.status).ok_or_else(|| {
        AppError::Database(format!("Unknown status '{}' on test result {}", model.status, id))
    })?;
    let assert_type = AssertType::parse(&model.assert_type).ok_or_else(|| {
        AppError::Database(format!(
            "Unknown assert type '{}' on test result {}",
            model.assert_type, id
        ))
    })?;
    let duration_ms = u64::try_from(model.duration_ms).map_err(|_| {
        AppError::Database(format!("Negative duration on test result {}", id))
    })?;

    Ok(TestMethodResult {
        id,
        run_id: model.run_id,
        iata: model.iata,
        suite_type: model.suite_type,
        feature_name: model.feature_name,
        method_name: model.method_name,
        class_name: model.class_name,
        status,
        assert_type,
        start_time: model.start_time,
        end_time: model.end_time,
        duration_ms,
        jira_test_cases: from_document(id, "jira_test_cases", model.jira_test_cases)?,
        environment: from_document(id, "environment", model.environment)?,
        logs: from_document(id, "logs", model.logs)?,
        screenshot_urls: from_document(id, "screenshot_urls", model.screenshot_urls)?,
        failures: from_document(id, "failures", model.failures)?,
    })
}

#[async_trait]
impl ResultStore for DbPool {
    async fn insert(&self, new: NewTestMethodResult) -> AppResult<TestMethodResult> {
        // UUIDv7 is time-ordered
        let id = Uuid::now_v7();
        let now = Utc::now();

        let mut model = TestMethodResultActiveModel {
            id: Set(id),
            created_at: Set(now),
            ..Default::default()
        };
        apply_fields(&mut model, &new)?;

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test result: {}", e)))?;

        into_record(result)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<TestMethodResult>> {
        let result = TestMethodResultEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test result: {}", e)))?;

        result.map(into_record).transpose()
    }

    async fn replace(
        &self,
        id: Uuid,
        new: NewTestMethodResult,
    ) -> AppResult<Option<TestMethodResult>> {
        let existing = TestMethodResultEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test result: {}", e)))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        apply_fields(&mut model, &new)?;

        let result = model
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test result: {}", e)))?;

        into_record(result).map(Some)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = TestMethodResultEntity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test result: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    async fn find(&self, filter: &ResultFilter) -> AppResult<Vec<TestMethodResult>> {
        let mut select = TestMethodResultEntity::find()
            .filter(Column::RunId.eq(filter.run_id.as_str()))
            .filter(Column::Iata.eq(filter.iata.as_str()));

        if let Some(ref suite_type) = filter.suite_type {
            select = select.filter(Column::SuiteType.eq(suite_type.as_str()));
        }
        if let Some(ref feature_name) = filter.feature_name {
            select = select.filter(Column::FeatureName.eq(feature_name.as_str()));
        }
        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let models = select
            .order_by_asc(Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query test results: {}", e)))?;

        models.into_iter().map(into_record).collect()
    }

    async fn run_id_page(&self, query: &RunIdPageQuery) -> AppResult<Vec<String>> {
        let rows = RunIdRow::find_by_statement(query.statement())
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list run ids: {}", e)))?;

        Ok(rows.into_iter().map(|row| row.run_id).collect())
    }

    async fn ping(&self) -> AppResult<()> {
        let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_owned());
        self.connection()
            .query_one_raw(stmt)
            .await
            .map_err(|e| AppError::Database(format!("Database connection failed: {}", e)))?;

        Ok(())
    }
}
