//! HTTP client for the test result API, for use by test runners.

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ProblemDetail;
use crate::models::{
    ApiResponse, RunIdPage, TestMethodResultRequest, TestMethodResultResponse, TestStatus,
};

/// Client-side failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport or body decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// A success envelope arrived without data
    #[error("Response envelope carried no data")]
    MissingData,
}

/// Thin wrapper over `reqwest` bound to one server.
#[derive(Debug, Clone)]
pub struct QaResultsClient {
    http: reqwest::Client,
    base_url: String,
}

impl QaResultsClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        QaResultsClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store one result; returns the new record id.
    pub async fn create_test_result(
        &self,
        iata: &str,
        request: &TestMethodResultRequest,
    ) -> Result<String, ClientError> {
        let url = self.tenant_url(iata);
        debug!("POST {}", url);
        let response = self.http.post(url).json(request).send().await?;
        read_data(response).await
    }

    pub async fn results_for_run(
        &self,
        iata: &str,
        run_id: &str,
        status: Option<TestStatus>,
    ) -> Result<Vec<TestMethodResultResponse>, ClientError> {
        let url = self.run_url(iata, run_id, status);
        self.get(url).await
    }

    pub async fn results_for_suite(
        &self,
        iata: &str,
        run_id: &str,
        suite_type: &str,
        status: Option<TestStatus>,
    ) -> Result<Vec<TestMethodResultResponse>, ClientError> {
        let url = self.grouped_url(iata, "suite", suite_type, run_id, status);
        self.get(url).await
    }

    pub async fn results_for_feature(
        &self,
        iata: &str,
        run_id: &str,
        feature_name: &str,
        status: Option<TestStatus>,
    ) -> Result<Vec<TestMethodResultResponse>, ClientError> {
        let url = self.grouped_url(iata, "feature", feature_name, run_id, status);
        self.get(url).await
    }

    pub async fn run_ids(&self, iata: &str, page: u64) -> Result<RunIdPage, ClientError> {
        let url = format!("{}/run-ids?page={}", self.tenant_url(iata), page);
        self.get(url).await
    }

    async fn get<T: DeserializeOwned>(&self, url: String) -> Result<T, ClientError> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        read_data(response).await
    }

    fn tenant_url(&self, iata: &str) -> String {
        format!(
            "{}/api/{}/test-results",
            self.base_url,
            urlencoding::encode(iata)
        )
    }

    fn run_url(&self, iata: &str, run_id: &str, status: Option<TestStatus>) -> String {
        let mut url = format!("{}/{}", self.tenant_url(iata), urlencoding::encode(run_id));
        if let Some(status) = status {
            url.push_str(&format!("?status={}", status.as_str()));
        }
        url
    }

    fn grouped_url(
        &self,
        iata: &str,
        group: &str,
        key: &str,
        run_id: &str,
        status: Option<TestStatus>,
    ) -> String {
        let mut url = format!(
            "{}/{}/{}?runId={}",
            self.tenant_url(iata),
            group,
            urlencoding::encode(key),
            urlencoding::encode(run_id)
        );
        if let Some(status) = status {
            url.push_str(&format!("&status={}", status.as_str()));
        }
        url
    }
}

/// Unwrap the success envelope, or surface the server's problem detail.
async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<ProblemDetail>()
            .await
            .map(|problem| problem.detail)
            .unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    let envelope: ApiResponse<T> = response.json().await?;
    envelope.data.ok_or(ClientError::MissingData)
}
