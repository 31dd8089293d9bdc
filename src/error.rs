use std::time::Duration;
use thiserror::Error;

/// Failure of a single place-search call.
///
/// These never abort a pipeline phase: the aggregating code logs them and
/// treats the call as having returned zero results.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Places API returned HTTP {0}")]
    Status(u16),

    #[error("Places API error status: {status}")]
    Api {
        status: String,
        message: Option<String>,
    },

    #[error("Failed to decode Places API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Search timed out after {0:?}")]
    Timeout(Duration),
}

impl SourceError {
    /// Rate limiting and timeouts are worth retrying at the HTTP client layer.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Http(_) | SourceError::Timeout(_) => true,
            SourceError::Status(code) => *code == 429 || *code >= 500,
            SourceError::Api { status, .. } => status == "OVER_QUERY_LIMIT",
            SourceError::Decode(_) => false,
        }
    }
}

/// Errors surfaced to the caller of the planner.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl PlannerError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::InvalidRequest(_) => "INVALID_REQUEST",
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::HttpClient(_) => "HTTP_CLIENT_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
