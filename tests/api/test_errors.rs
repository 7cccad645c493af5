//! Method and route fallbacks, health probes.

use actix_web::test;

use super::helpers::*;

#[actix_rt::test]
async fn test_unsupported_method_on_run_lookup() {
    let app = create_test_app().await;

    let (status, content_type, body) =
        send(&app, test::TestRequest::post().uri("/api/AA/test-results/run-1")).await;

    assert_eq!(status, 405);
    assert_eq!(content_type, "application/problem+json");
    assert_problem(&body, 405, "Method Not Allowed");
    assert_eq!(body["detail"], "Request method 'POST' is not supported");
}

#[actix_rt::test]
async fn test_unsupported_method_on_collection() {
    let app = create_test_app().await;

    let (status, _, body) =
        send(&app, test::TestRequest::delete().uri("/api/AA/test-results")).await;

    assert_eq!(status, 405);
    assert_eq!(body["detail"], "Request method 'DELETE' is not supported");
}

#[actix_rt::test]
async fn test_unsupported_method_on_run_ids() {
    let app = create_test_app().await;

    let (status, _, _) =
        send(&app, test::TestRequest::put().uri("/api/AA/test-results/run-ids")).await;

    assert_eq!(status, 405);
}

#[actix_rt::test]
async fn test_unknown_route_is_problem_detail() {
    let app = create_test_app().await;

    let (status, content_type, body) = send(&app, test::TestRequest::get().uri("/nope")).await;

    assert_eq!(status, 404);
    assert_eq!(content_type, "application/problem+json");
    assert_problem(&body, 404, "Resource Not Found");
    assert_eq!(body["path"], "/nope");
}

#[actix_rt::test]
async fn test_health_and_ready() {
    let app = create_test_app().await;

    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get_json(&app, "/api/ready").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ready");
}
