//! Shared helpers for API tests.

use std::num::NonZeroU32;
use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use qa_results_lib::api;
use qa_results_lib::db::MemoryStore;
use qa_results_lib::middleware::RequestLogger;
use qa_results_lib::services::TestResultService;
use serde_json::{Value, json};

/// Service over a fresh in-memory store.
pub fn memory_service(page_size: u32) -> TestResultService {
    TestResultService::new(
        Arc::new(MemoryStore::new()),
        NonZeroU32::new(page_size).expect("page size must be non-zero"),
    )
}

/// Wire `service` into an app configured like the server binary.
pub fn build_app(
    service: TestResultService,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestLogger)
        .app_data(web::Data::new(service))
        .configure(api::configure_health_routes)
        .configure(api::configure_test_results_routes)
        .default_service(web::to(api::not_found))
}

/// Create a test app with the default run-id page size.
pub async fn create_test_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(build_app(memory_service(10))).await
}

/// Create a test app with a custom run-id page size.
pub async fn create_test_app_with_page_size(
    page_size: u32,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(build_app(memory_service(page_size))).await
}

/// Minimal valid request body.
pub fn result_body(run_id: &str, suite_type: &str, feature_name: &str, status: &str) -> Value {
    json!({
        "runId": run_id,
        "suiteType": suite_type,
        "featureName": feature_name,
        "methodName": "checksInPassenger",
        "className": "CheckInTest",
        "status": status,
        "assertType": "HARD",
        "startTime": "2026-10-19T08:00:00Z",
        "endTime": "2026-10-19T08:00:01.500Z",
        "durationMs": 1500
    })
}

/// POST a result; returns status, body and Location header.
pub async fn post_result<S>(app: &S, iata: &str, body: &Value) -> (u16, Value, Option<String>)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/{}/test-results", iata))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body: Value = test::read_body_json(resp).await;
    (status, body, location)
}

/// POST a result and return its id.
pub async fn create_result<S>(app: &S, iata: &str, body: &Value) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body, _) = post_result(app, iata, body).await;
    assert_eq!(status, 201, "create failed: {:?}", body);
    body["data"].as_str().expect("id in data").to_string()
}

/// Send a request; returns status, content type and JSON body.
pub async fn send<S>(app: &S, req: test::TestRequest) -> (u16, String, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body: Value = test::read_body_json(resp).await;
    (status, content_type, body)
}

pub async fn get_json<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, _, body) = send(app, test::TestRequest::get().uri(uri)).await;
    (status, body)
}

/// Assert `body` is a problem detail with the given status and title.
pub fn assert_problem(body: &Value, status: u16, title: &str) {
    assert_eq!(body["type"], "about:blank", "not a problem detail: {:?}", body);
    assert_eq!(body["status"], status);
    assert_eq!(body["title"], title);
    assert!(body["detail"].is_string());
    assert!(body["timestamp"].is_string());
    assert!(body["path"].is_string());
}
