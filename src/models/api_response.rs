//! Success envelope shared by every API response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Path of the request (or of the created resource).
    pub path: String,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T, path: impl Into<String>) -> Self {
        Self::with_message(data, "OK", path)
    }

    /// Successful response for a newly created resource.
    pub fn created(data: T, path: impl Into<String>) -> Self {
        Self::with_message(data, "Created", path)
    }

    pub fn with_message(data: T, message: &str, path: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: message.to_string(),
            timestamp: Utc::now(),
            path: path.into(),
        }
    }

    /// Successful response without a payload.
    pub fn empty(message: &str, path: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            message: message.to_string(),
            timestamp: Utc::now(),
            path: path.into(),
        }
    }
}
