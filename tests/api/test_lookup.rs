//! Lookups by run, suite and feature, with and without a status filter.

use super::helpers::*;

#[actix_rt::test]
async fn test_unknown_run_not_found() {
    let app = create_test_app().await;

    let (status, body) = get_json(&app, "/api/AA/test-results/nope").await;

    assert_eq!(status, 404);
    assert_problem(&body, 404, "Resource Not Found");
    assert_eq!(body["detail"], "Run id not found: nope, iata=AA");
    assert_eq!(body["path"], "/api/AA/test-results/nope");
}

#[actix_rt::test]
async fn test_unknown_run_with_status_filter_is_empty() {
    let app = create_test_app().await;

    let (status, body) = get_json(&app, "/api/AA/test-results/nope?status=FAIL").await;

    assert_eq!(status, 200);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[actix_rt::test]
async fn test_status_filter_is_case_insensitive() {
    let app = create_test_app().await;
    create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "PASS")).await;
    create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "FAIL")).await;
    create_result(&app, "AA", &result_body("run-1", "PAX2", "Boarding", "FAIL")).await;

    let (status, body) = get_json(&app, "/api/AA/test-results/run-1?status=%20fail%20").await;

    assert_eq!(status, 200);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r["status"] == "FAIL"));
}

#[actix_rt::test]
async fn test_blank_status_means_no_filter() {
    let app = create_test_app().await;
    create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "PASS")).await;
    create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "SKIP")).await;

    let (status, body) = get_json(&app, "/api/AA/test-results/run-1?status=").await;

    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_invalid_status_is_bad_request() {
    let app = create_test_app().await;

    let (status, body) = get_json(&app, "/api/AA/test-results/run-1?status=broken").await;

    assert_eq!(status, 400);
    assert_problem(&body, 400, "Invalid Request Parameter");
    assert_eq!(
        body["detail"],
        "Invalid value for query parameter 'status': 'broken'. Allowed values are PASS, FAIL, SKIP. Use ?status=PASS|FAIL|SKIP"
    );
}

#[actix_rt::test]
async fn test_results_keep_insertion_order() {
    let app = create_test_app().await;
    let first = create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "PASS")).await;
    let second = create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "FAIL")).await;

    let (_, body) = get_json(&app, "/api/AA/test-results/run-1").await;

    assert_eq!(body["data"][0]["id"], first);
    assert_eq!(body["data"][1]["id"], second);
}

#[actix_rt::test]
async fn test_suite_lookup() {
    let app = create_test_app().await;
    create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "PASS")).await;
    create_result(&app, "AA", &result_body("run-1", "PAX2", "CheckIn", "FAIL")).await;

    let (status, body) = get_json(&app, "/api/AA/test-results/suite/PAX2?runId=run-1").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["suiteType"], "PAX2");

    let (status, body) =
        get_json(&app, "/api/AA/test-results/suite/PAX2?runId=run-1&status=PASS").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"], serde_json::json!([]));

    let (status, body) = get_json(&app, "/api/AA/test-results/suite/PAX9?runId=run-1").await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "No results for runId=run-1, suiteType=PAX9, iata=AA");
}

#[actix_rt::test]
async fn test_suite_lookup_requires_run_id() {
    let app = create_test_app().await;

    let (status, body) = get_json(&app, "/api/AA/test-results/suite/PAX1").await;

    assert_eq!(status, 400);
    assert_problem(&body, 400, "Invalid Request Parameter");
}

#[actix_rt::test]
async fn test_feature_lookup() {
    let app = create_test_app().await;
    create_result(&app, "AA", &result_body("run-1", "PAX1", "Seat Map", "FAIL")).await;
    create_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "FAIL")).await;

    let (status, body) =
        get_json(&app, "/api/AA/test-results/feature/Seat%20Map?runId=run-1&status=fail").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["featureName"], "Seat Map");

    let (status, body) = get_json(&app, "/api/AA/test-results/feature/Search?runId=run-1").await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "No results for runId=run-1, featureName=Search, iata=AA");
}

#[actix_rt::test]
async fn test_tenants_are_isolated() {
    let app = create_test_app().await;
    create_result(&app, "BB", &result_body("run-1", "PAX1", "CheckIn", "PASS")).await;

    let (status, body) = get_json(&app, "/api/AA/test-results/run-1").await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Run id not found: run-1, iata=AA");

    let (status, body) = get_json(&app, "/api/BB/test-results/run-1").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["iata"], "BB");
}
