//! Response types for the coffee team API.
//!
//! This module defines the success payload, the error response structures,
//! and the mapping from [`EngineError`] to HTTP statuses. Error bodies never
//! carry upstream response bodies or backend stderr; those are only logged.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::TabularArtifact;

/// One row of the grouping as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingRecord {
    /// Employee name.
    pub name: String,
    /// Label of the team the employee was drawn into.
    pub coffee_team: String,
    /// The employee's department.
    pub team: String,
}

/// Body of a successful `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingResponse {
    /// Column names of the exported grouping.
    pub header: Vec<String>,
    /// The grouping, one record per employee.
    pub records: Vec<GroupingRecord>,
    /// Download path of the CSV file.
    pub csv_path: String,
    /// Download path of the spreadsheet.
    pub xlsx_path: String,
}

impl GroupingResponse {
    /// Builds the response body for an artifact and its stored file names.
    pub fn new(artifact: &TabularArtifact, csv_name: &str, sheet_name: &str) -> Self {
        let records = artifact
            .rows()
            .iter()
            .map(|row| {
                let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
                GroupingRecord {
                    name: cell(0),
                    coffee_team: cell(1),
                    team: cell(2),
                }
            })
            .collect();
        Self {
            header: artifact.header().to_vec(),
            records,
            csv_path: format!("/artifacts/{}", csv_name),
            xlsx_path: format!("/artifacts/{}", sheet_name),
        }
    }
}

/// One row of a desk swap as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    /// Employee moving desks.
    pub name: String,
    /// The employee's department.
    pub team: String,
    /// Whose desk the employee takes.
    pub replaces: String,
    /// Label of the swap group.
    pub swap_group: String,
}

/// Body of a successful `GET /swaps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResponse {
    /// Column names of the exported swap.
    pub header: Vec<String>,
    /// The swap, one record per mover, sorted by name.
    pub records: Vec<SwapRecord>,
    /// Download path of the CSV file.
    pub csv_path: String,
    /// Download path of the spreadsheet.
    pub xlsx_path: String,
}

impl SwapResponse {
    /// Builds the response body for a swap artifact and its stored file names.
    pub fn new(artifact: &TabularArtifact, csv_name: &str, sheet_name: &str) -> Self {
        let records = artifact
            .rows()
            .iter()
            .map(|row| {
                let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
                SwapRecord {
                    name: cell(0),
                    team: cell(1),
                    replaces: cell(2),
                    swap_group: cell(3),
                }
            })
            .collect();
        Self {
            header: artifact.header().to_vec(),
            records,
            csv_path: format!("/artifacts/{}", csv_name),
            xlsx_path: format!("/artifacts/{}", sheet_name),
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates an artifact not found error response.
    pub fn artifact_not_found(name: &str) -> Self {
        Self::new("ARTIFACT_NOT_FOUND", format!("Artifact not found: {}", name))
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfiguration { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CONFIG_ERROR", "Service is misconfigured"),
            ),
            EngineError::AuthenticationError { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("HR_AUTHENTICATION_FAILED", "Could not log in to the HR service"),
            ),
            EngineError::RequestFailed { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("HR_UNREACHABLE", "Could not reach the HR service"),
            ),
            EngineError::UpstreamError { status, .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::with_details(
                    "HR_UPSTREAM_ERROR",
                    "The HR service rejected a request",
                    format!("HR service answered with status {}", status),
                ),
            ),
            EngineError::DecodeError { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("HR_DECODE_ERROR", "The HR service sent an unreadable response"),
            ),
            EngineError::GroupingBackendError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("GROUPING_FAILED", "Grouping backend failed"),
            ),
            EngineError::EmitterError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("EMITTER_FAILED", "Spreadsheet conversion failed"),
            ),
            EngineError::ArtifactError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("ARTIFACT_ERROR", "Failed to write the grouping"),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
