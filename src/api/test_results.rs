//! Test result API handlers, all scoped to a tenant (`iata`).

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Deserializer};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, AppError, AppResult, ProblemDetail, ResultExt};
use crate::models::{
    ApiResponse, RunIdPage, TestMethodResult, TestMethodResultRequest, TestMethodResultResponse,
    TestStatus,
};
use crate::services::TestResultService;

#[derive(Debug, Deserialize)]
pub struct TenantPath {
    pub iata: String,
}

#[derive(Debug, Deserialize)]
pub struct RunPath {
    pub iata: String,
    pub run_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SuitePath {
    pub iata: String,
    pub suite_type: String,
}

#[derive(Debug, Deserialize)]
pub struct FeaturePath {
    pub iata: String,
    pub feature_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordPath {
    pub iata: String,
    pub id: Uuid,
}

/// Optional `status` filter.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// Required `runId` plus optional `status` filter.
#[derive(Debug, Deserialize)]
pub struct RunStatusQuery {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<i64>,
}

/// `?page=` with no value reads the same as an absent parameter.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parse the `status` query parameter. Absent or blank means no filter.
pub fn parse_status_filter(raw: Option<&str>) -> AppResult<Option<TestStatus>> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => TestStatus::parse(value).map(Some).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Invalid value for query parameter 'status': '{}'. Allowed values are PASS, FAIL, SKIP. Use ?status=PASS|FAIL|SKIP",
                value
            ))
        }),
    }
}

fn to_responses(results: Vec<TestMethodResult>) -> Vec<TestMethodResultResponse> {
    results.into_iter().map(TestMethodResultResponse::from).collect()
}

/// Store a new test method result.
#[utoipa::path(
    post,
    path = "/api/{iata}/test-results",
    tag = "Test Results",
    params(("iata" = String, Path, description = "Tenant code")),
    request_body = TestMethodResultRequest,
    responses(
        (status = 201, description = "Test result stored; data is the new id", body = ApiResponse<String>),
        (status = 400, description = "Malformed or invalid body", body = ProblemDetail),
    )
)]
pub async fn create_test_result(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<TenantPath>,
    body: web::Json<TestMethodResultRequest>,
) -> Result<HttpResponse, ApiError> {
    let iata = path.into_inner().iata;
    let request = body.into_inner();
    info!(
        "POST create test result iata={} runId={} feature={} status={}",
        iata, request.run_id, request.feature_name, request.status
    );

    let saved = service
        .create(request.into_new(&iata))
        .await
        .for_request(&req)?;

    let location = format!("{}/records/{}", req.path().trim_end_matches('/'), saved.id);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location.clone()))
        .json(ApiResponse::created(saved.id.to_string(), location)))
}

/// List the results of one run.
#[utoipa::path(
    get,
    path = "/api/{iata}/test-results/{run_id}",
    tag = "Test Results",
    params(
        ("iata" = String, Path, description = "Tenant code"),
        ("run_id" = String, Path, description = "Run identifier"),
        ("status" = Option<String>, Query, description = "PASS, FAIL or SKIP (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Results of the run", body = ApiResponse<Vec<TestMethodResultResponse>>),
        (status = 400, description = "Invalid status filter", body = ProblemDetail),
        (status = 404, description = "Run not found (only without a status filter)", body = ProblemDetail),
    )
)]
pub async fn list_results_by_run(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<RunPath>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, ApiError> {
    let RunPath { iata, run_id } = path.into_inner();
    let status = parse_status_filter(query.status.as_deref()).for_request(&req)?;
    info!("GET results iata={} runId={} status={:?}", iata, run_id, status);

    let results = service
        .results_for_run(&run_id, &iata, status)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_responses(results), req.path())))
}

/// List the results of one suite within a run.
#[utoipa::path(
    get,
    path = "/api/{iata}/test-results/suite/{suite_type}",
    tag = "Test Results",
    params(
        ("iata" = String, Path, description = "Tenant code"),
        ("suite_type" = String, Path, description = "Suite type"),
        ("runId" = String, Query, description = "Run identifier"),
        ("status" = Option<String>, Query, description = "PASS, FAIL or SKIP (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Results of the suite", body = ApiResponse<Vec<TestMethodResultResponse>>),
        (status = 400, description = "Missing runId or invalid status filter", body = ProblemDetail),
        (status = 404, description = "No results (only without a status filter)", body = ProblemDetail),
    )
)]
pub async fn list_results_by_suite(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<SuitePath>,
    query: web::Query<RunStatusQuery>,
) -> Result<HttpResponse, ApiError> {
    let SuitePath { iata, suite_type } = path.into_inner();
    let RunStatusQuery { run_id, status } = query.into_inner();
    let status = parse_status_filter(status.as_deref()).for_request(&req)?;
    info!(
        "GET results iata={} runId={} suiteType={} status={:?}",
        iata, run_id, suite_type, status
    );

    let results = service
        .results_for_suite(&run_id, &suite_type, &iata, status)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_responses(results), req.path())))
}

/// List the results of one feature within a run.
#[utoipa::path(
    get,
    path = "/api/{iata}/test-results/feature/{feature_name}",
    tag = "Test Results",
    params(
        ("iata" = String, Path, description = "Tenant code"),
        ("feature_name" = String, Path, description = "Feature name"),
        ("runId" = String, Query, description = "Run identifier"),
        ("status" = Option<String>, Query, description = "PASS, FAIL or SKIP (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Results of the feature", body = ApiResponse<Vec<TestMethodResultResponse>>),
        (status = 400, description = "Missing runId or invalid status filter", body = ProblemDetail),
        (status = 404, description = "No results (only without a status filter)", body = ProblemDetail),
    )
)]
pub async fn list_results_by_feature(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<FeaturePath>,
    query: web::Query<RunStatusQuery>,
) -> Result<HttpResponse, ApiError> {
    let FeaturePath { iata, feature_name } = path.into_inner();
    let RunStatusQuery { run_id, status } = query.into_inner();
    let status = parse_status_filter(status.as_deref()).for_request(&req)?;
    info!(
        "GET results iata={} runId={} featureName={} status={:?}",
        iata, run_id, feature_name, status
    );

    let results = service
        .results_for_feature(&run_id, &feature_name, &iata, status)
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_responses(results), req.path())))
}

/// Page through the tenant's distinct run ids, newest run first.
#[utoipa::path(
    get,
    path = "/api/{iata}/test-results/run-ids",
    tag = "Test Results",
    params(
        ("iata" = String, Path, description = "Tenant code"),
        ("page" = Option<i64>, Query, description = "Zero-based page (default 0, negatives read as 0)")
    ),
    responses(
        (status = 200, description = "One page of run ids", body = ApiResponse<RunIdPage>),
        (status = 400, description = "Non-integer page", body = ProblemDetail),
    )
)]
pub async fn list_run_ids(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<TenantPath>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, ApiError> {
    let iata = path.into_inner().iata;
    let page = query.page.unwrap_or(0);

    let run_ids = service.run_ids(&iata, page).await.for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(run_ids, req.path())))
}

/// Fetch one stored record.
#[utoipa::path(
    get,
    path = "/api/{iata}/test-results/records/{id}",
    tag = "Test Results",
    params(
        ("iata" = String, Path, description = "Tenant code"),
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "The record", body = ApiResponse<TestMethodResultResponse>),
        (status = 404, description = "No such record for this tenant", body = ProblemDetail),
    )
)]
pub async fn get_test_result(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<RecordPath>,
) -> Result<HttpResponse, ApiError> {
    let RecordPath { iata, id } = path.into_inner();

    let record = service.get(&iata, id).await.for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        TestMethodResultResponse::from(record),
        req.path(),
    )))
}

/// Replace a stored record. The id and tenant are kept.
#[utoipa::path(
    put,
    path = "/api/{iata}/test-results/records/{id}",
    tag = "Test Results",
    params(
        ("iata" = String, Path, description = "Tenant code"),
        ("id" = Uuid, Path, description = "Record id")
    ),
    request_body = TestMethodResultRequest,
    responses(
        (status = 200, description = "The replaced record", body = ApiResponse<TestMethodResultResponse>),
        (status = 400, description = "Malformed or invalid body", body = ProblemDetail),
        (status = 404, description = "No such record for this tenant", body = ProblemDetail),
    )
)]
pub async fn update_test_result(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<RecordPath>,
    body: web::Json<TestMethodResultRequest>,
) -> Result<HttpResponse, ApiError> {
    let RecordPath { iata, id } = path.into_inner();
    info!("PUT test result iata={} id={}", iata, id);

    let updated = service
        .update(&iata, id, body.into_inner().into_new(&iata))
        .await
        .for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        TestMethodResultResponse::from(updated),
        req.path(),
    )))
}

/// Delete a stored record.
#[utoipa::path(
    delete,
    path = "/api/{iata}/test-results/records/{id}",
    tag = "Test Results",
    params(
        ("iata" = String, Path, description = "Tenant code"),
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record deleted", body = ApiResponse<String>),
        (status = 404, description = "No such record for this tenant", body = ProblemDetail),
    )
)]
pub async fn delete_test_result(
    req: HttpRequest,
    service: web::Data<TestResultService>,
    path: web::Path<RecordPath>,
) -> Result<HttpResponse, ApiError> {
    let RecordPath { iata, id } = path.into_inner();
    info!("DELETE test result iata={} id={}", iata, id);

    service.delete(&iata, id).await.for_request(&req)?;

    Ok(HttpResponse::Ok().json(ApiResponse::<String>::empty("Deleted", req.path())))
}

/// Fallback for a known resource hit with an unsupported method.
pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(AppError::MethodNotAllowed(req.method().to_string()).at(req.path()))
}

/// Fallback for paths no route matches.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(AppError::NotFound(format!("No endpoint {} {}", req.method(), req.path())).at(req.path()))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        AppError::InvalidInput(format!("Malformed request body: {}", err))
            .at(req.path())
            .into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        AppError::InvalidInput(format!("Invalid query string: {}", err))
            .at(req.path())
            .into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        AppError::InvalidInput(format!("Invalid path parameter: {}", err))
            .at(req.path())
            .into()
    })
}

/// Configure test result routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/{iata}/test-results")
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(
                web::resource("")
                    .route(web::post().to(create_test_result))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/run-ids")
                    .route(web::get().to(list_run_ids))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/suite/{suite_type}")
                    .route(web::get().to(list_results_by_suite))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/feature/{feature_name}")
                    .route(web::get().to(list_results_by_feature))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/records/{id}")
                    .route(web::get().to(get_test_result))
                    .route(web::put().to(update_test_result))
                    .route(web::delete().to(delete_test_result))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/{run_id}")
                    .route(web::get().to(list_results_by_run))
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
