//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QA Test Result Service API",
        version = "0.1.0",
        description = "Stores per-method automated test results and serves them back per tenant, run, suite and feature",
        license(name = "Apache 2.0", url = "https://www.apache.org/licenses/LICENSE-2.0")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Test result endpoints
        api::test_results::create_test_result,
        api::test_results::list_results_by_run,
        api::test_results::list_results_by_suite,
        api::test_results::list_results_by_feature,
        api::test_results::list_run_ids,
        api::test_results::get_test_result,
        api::test_results::update_test_result,
        api::test_results::delete_test_result,
    ),
    components(
        schemas(
            // Common
            error::ProblemDetail,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Test results
            models::TestStatus,
            models::AssertType,
            models::EnvironmentInfo,
            models::FailureDetail,
            models::TestMethodResultRequest,
            models::TestMethodResultResponse,
            models::RunIdPage,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Test Results", description = "Per-tenant test method results")
    )
)]
pub struct ApiDoc;
