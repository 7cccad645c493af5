//! Domain error types for the QA results server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! Handlers attach the request path to an [`AppError`] (see [`ResultExt::for_request`])
//! so the rendered problem detail can report where the failure happened.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (store unreachable, timeout, corrupt row)
    #[error("Database error: {0}")]
    Database(String),

    /// No record matched a required lookup
    #[error("{0}")]
    NotFound(String),

    /// Invalid input data
    #[error("{0}")]
    InvalidInput(String),

    /// HTTP method not supported by the matched resource
    #[error("Request method '{0}' is not supported")]
    MethodNotAllowed(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Internal Server Error",
            AppError::NotFound(_) => "Resource Not Found",
            AppError::InvalidInput(_) => "Invalid Request Parameter",
            AppError::MethodNotAllowed(_) => "Method Not Allowed",
        }
    }

    /// Attach the path of the request that failed.
    pub fn at(self, path: impl Into<String>) -> ApiError {
        ApiError {
            error: self,
            path: path.into(),
        }
    }
}

/// An [`AppError`] bound to the request path it occurred on.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ApiError {
    pub error: AppError,
    pub path: String,
}

impl ApiError {
    pub fn problem(&self) -> ProblemDetail {
        let detail = match &self.error {
            // Never leak driver messages to callers
            AppError::Database(_) => "An internal database error occurred".to_string(),
            other => other.to_string(),
        };

        ProblemDetail {
            problem_type: "about:blank".to_string(),
            title: self.error.title().to_string(),
            status: self.error.status_code().as_u16(),
            detail,
            timestamp: Utc::now(),
            path: self.path.clone(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.error.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        match &self.error {
            AppError::Database(err_str) => {
                tracing::error!(path = %self.path, "Database error: {}", err_str);
            }
            AppError::NotFound(message) => {
                tracing::warn!("Resource not found path={} message={}", self.path, message);
            }
            AppError::InvalidInput(message) => {
                tracing::warn!("Bad request path={} message={}", self.path, message);
            }
            AppError::MethodNotAllowed(method) => {
                tracing::warn!("Method not allowed path={} method={}", self.path, method);
            }
        }

        HttpResponse::build(self.status_code())
            .content_type("application/problem+json")
            .json(self.problem())
    }
}

/// Problem detail body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetail {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
    pub path: String,
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

/// Bind service-layer results to the request being handled.
pub trait ResultExt<T> {
    fn for_request(self, req: &HttpRequest) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for AppResult<T> {
    fn for_request(self, req: &HttpRequest) -> Result<T, ApiError> {
        self.map_err(|e| e.at(req.path()))
    }
}

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}
