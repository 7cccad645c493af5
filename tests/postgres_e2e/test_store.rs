//! E2E tests: record persistence through the PostgreSQL store.

use std::num::NonZeroU32;
use std::sync::Arc;

use actix_web::http::StatusCode;
use qa_results_lib::db::{ResultFilter, ResultStore};
use qa_results_lib::error::AppError;
use qa_results_lib::models::{EnvironmentInfo, FailureDetail, TestStatus};
use qa_results_lib::services::TestResultService;

use super::test_helpers::*;

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_and_read_back_documents() {
    let pool = create_test_pool().await;
    let iata = unique_iata("doc");
    let mut new = draft("run-1", &iata, TestStatus::Fail);
    new.jira_test_cases = Some(Vec::new());
    new.environment = Some(EnvironmentInfo {
        name: Some("QA".to_string()),
        os: Some("linux".to_string()),
        ..Default::default()
    });
    new.failures = Some(vec![FailureDetail {
        error_message: Some("gate closed".to_string()),
        ..Default::default()
    }]);

    let saved = pool.insert(new).await.unwrap();
    let loaded = pool.find_by_id(saved.id).await.unwrap().unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(loaded.jira_test_cases, Some(Vec::new()));
    assert_eq!(loaded.logs, None);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_filters_and_order() {
    let pool = create_test_pool().await;
    let iata = unique_iata("flt");

    let first = pool.insert(draft("run-1", &iata, TestStatus::Pass)).await.unwrap();
    let second = pool.insert(draft("run-1", &iata, TestStatus::Fail)).await.unwrap();
    pool.insert(draft("run-2", &iata, TestStatus::Fail)).await.unwrap();

    let all = pool.find(&ResultFilter::run("run-1", &iata)).await.unwrap();
    assert_eq!(
        all.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );

    let failed = pool
        .find(&ResultFilter::run("run-1", &iata).with_status(TestStatus::Fail))
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].id, second.id);

    let other_tenant = pool
        .find(&ResultFilter::run("run-1", &unique_iata("other")))
        .await
        .unwrap();
    assert!(other_tenant.is_empty());
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_replace_and_delete() {
    let pool = create_test_pool().await;
    let iata = unique_iata("rpl");
    let saved = pool.insert(draft("run-1", &iata, TestStatus::Pass)).await.unwrap();

    let replaced = pool
        .replace(saved.id, draft("run-1", &iata, TestStatus::Skip))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.id, saved.id);
    assert_eq!(replaced.status, TestStatus::Skip);

    assert!(pool.delete(saved.id).await.unwrap());
    assert!(!pool.delete(saved.id).await.unwrap());
    assert!(pool.find_by_id(saved.id).await.unwrap().is_none());
    assert!(pool
        .replace(saved.id, draft("run-1", &iata, TestStatus::Pass))
        .await
        .unwrap()
        .is_none());
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_ping() {
    let pool = create_test_pool().await;
    pool.ping().await.unwrap();
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_long_identifiers_round_trip() {
    let pool = create_test_pool().await;
    let iata = format!("{}{}", unique_iata("long"), "A".repeat(70));
    let run_id = "r".repeat(300);
    let mut new = draft(&run_id, &iata, TestStatus::Pass);
    new.class_name = "C".repeat(600);

    let saved = pool.insert(new).await.unwrap();
    let found = pool.find(&ResultFilter::run(&run_id, &iata)).await.unwrap();

    assert_eq!(found, vec![saved]);
    assert_eq!(found[0].class_name.len(), 600);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_nul_characters_rejected_before_storage() {
    let service = TestResultService::new(
        Arc::new(create_test_pool().await),
        NonZeroU32::new(10).unwrap(),
    );
    let iata = unique_iata("nul");
    let mut new = draft("run-1", &iata, TestStatus::Fail);
    new.logs = Some(vec!["line\u{0}with nul".to_string()]);

    let err = service.create(new).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(service.run_ids(&iata, 0).await.unwrap().run_ids.is_empty());
}
