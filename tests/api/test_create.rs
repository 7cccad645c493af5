//! Creating results: status code, Location header, validation.

use actix_web::test;
use serde_json::json;

use super::helpers::*;

#[actix_rt::test]
async fn test_create_returns_location_and_id() {
    let app = create_test_app().await;

    let (status, body, location) =
        post_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "PASS")).await;

    assert_eq!(status, 201, "{:?}", body);
    let id = body["data"].as_str().expect("id");
    let location = location.expect("Location header");
    assert_eq!(location, format!("/api/AA/test-results/records/{}", id));
    assert_eq!(body["path"], location);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Created");
}

#[actix_rt::test]
async fn test_created_record_round_trips() {
    let app = create_test_app().await;
    let mut request = result_body("run-1", "PAX1", "CheckIn", "FAIL");
    request["jiraTestCases"] = json!([]);
    request["logs"] = json!(["step 1", "step 2"]);
    request["environment"] = json!({"name": "Staging", "browser": "chrome", "browserVersion": "129"});
    request["failures"] = json!([
        {"errorMessage": "expected seat 12A", "stackTrace": "at CheckInTest:42"},
        {"errorMessage": "banner missing"}
    ]);

    let id = create_result(&app, "AA", &request).await;
    let (status, body) = get_json(&app, &format!("/api/AA/test-results/records/{}", id)).await;

    assert_eq!(status, 200);
    let record = &body["data"];
    assert_eq!(record["id"], id);
    assert_eq!(record["iata"], "AA");
    assert_eq!(record["runId"], "run-1");
    assert_eq!(record["status"], "FAIL");
    assert_eq!(record["assertType"], "HARD");
    assert_eq!(record["durationMs"], 1500);
    assert_eq!(record["startTime"], "2026-10-19T08:00:00Z");
    assert_eq!(record["jiraTestCases"], json!([]));
    assert_eq!(record["logs"], json!(["step 1", "step 2"]));
    assert_eq!(record["environment"]["browserVersion"], "129");
    assert_eq!(record["failures"][1]["errorMessage"], "banner missing");
    // Absent lists stay absent
    assert!(record.get("screenshotUrls").is_none());
}

#[actix_rt::test]
async fn test_enum_values_in_body_are_case_insensitive() {
    let app = create_test_app().await;
    let mut request = result_body("run-1", "PAX1", "CheckIn", "skip");
    request["assertType"] = json!("soft");

    let id = create_result(&app, "AA", &request).await;
    let (_, body) = get_json(&app, &format!("/api/AA/test-results/records/{}", id)).await;

    assert_eq!(body["data"]["status"], "SKIP");
    assert_eq!(body["data"]["assertType"], "SOFT");
}

#[actix_rt::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/api/AA/test-results")
        .set_json(json!({"runId": "run-1"}));
    let (status, content_type, body) = send(&app, req).await;

    assert_eq!(status, 400);
    assert_eq!(content_type, "application/problem+json");
    assert_problem(&body, 400, "Invalid Request Parameter");
}

#[actix_rt::test]
async fn test_unknown_status_in_body_rejected() {
    let app = create_test_app().await;

    let (status, body, _) =
        post_result(&app, "AA", &result_body("run-1", "PAX1", "CheckIn", "FLAKY")).await;

    assert_eq!(status, 400);
    assert_problem(&body, 400, "Invalid Request Parameter");
}

#[actix_rt::test]
async fn test_negative_duration_rejected() {
    let app = create_test_app().await;
    let mut request = result_body("run-1", "PAX1", "CheckIn", "PASS");
    request["durationMs"] = json!(-5);

    let (status, _, _) = post_result(&app, "AA", &request).await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_end_before_start_rejected() {
    let app = create_test_app().await;
    let mut request = result_body("run-1", "PAX1", "CheckIn", "PASS");
    request["endTime"] = json!("2026-10-19T07:59:59Z");

    let (status, body, _) = post_result(&app, "AA", &request).await;

    assert_eq!(status, 400);
    assert_eq!(body["detail"], "endTime must not be before startTime");
}

#[actix_rt::test]
async fn test_blank_run_id_rejected() {
    let app = create_test_app().await;

    let (status, body, _) =
        post_result(&app, "AA", &result_body("  ", "PAX1", "CheckIn", "PASS")).await;

    assert_eq!(status, 400);
    assert_eq!(body["detail"], "runId must not be empty");
}

#[actix_rt::test]
async fn test_nul_in_logs_rejected() {
    let app = create_test_app().await;
    let mut request = result_body("run-1", "PAX1", "CheckIn", "FAIL");
    request["logs"] = json!(["line\u{0}with nul"]);

    let (status, body, location) = post_result(&app, "AA", &request).await;

    assert_eq!(status, 400);
    assert_problem(&body, 400, "Invalid Request Parameter");
    assert_eq!(body["detail"], "logs must not contain NUL characters");
    assert!(location.is_none());
}
