//! Shared helpers for PostgreSQL E2E tests.

use std::sync::OnceLock;

use chrono::{Duration, Utc};
use qa_results_lib::config::Config;
use qa_results_lib::db::DbPool;
use qa_results_lib::models::{AssertType, NewTestMethodResult, TestStatus};
use uuid::Uuid;

static MIGRATIONS_RUN: OnceLock<()> = OnceLock::new();

/// Create a fresh DB pool. Migrations run only once.
pub async fn create_test_pool() -> DbPool {
    let mut config = Config::from_env().expect(
        "Failed to load config. Ensure RUST_ENV and DATABASE_URL are set, \
         and that PostgreSQL is running.",
    );
    config.database.max_connections = 2;
    config.database.min_connections = 1;

    let pool = DbPool::new(&config.database)
        .await
        .expect("Failed to connect to database");

    if MIGRATIONS_RUN.get().is_none() {
        pool.run_migrations()
            .await
            .expect("Failed to run migrations");
        let _ = MIGRATIONS_RUN.set(());
    }

    pool
}

/// Generate a unique tenant code for test isolation.
pub fn unique_iata(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        Uuid::new_v4().to_string().split('-').next().unwrap()
    )
}

pub fn draft(run_id: &str, iata: &str, status: TestStatus) -> NewTestMethodResult {
    let start = Utc::now();
    NewTestMethodResult {
        run_id: run_id.to_string(),
        iata: iata.to_string(),
        suite_type: "PAX1".to_string(),
        feature_name: "Boarding".to_string(),
        method_name: "scansBoardingPass".to_string(),
        class_name: "BoardingTest".to_string(),
        status,
        assert_type: AssertType::Soft,
        start_time: start,
        end_time: start + Duration::milliseconds(800),
        duration_ms: 800,
        jira_test_cases: None,
        environment: None,
        logs: None,
        screenshot_urls: None,
        failures: None,
    }
}
