// Error types shared across layers
use crate::domain::session::ShopDomainError;
use thiserror::Error;

/// Errors from talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("event stream error: {0}")]
    Stream(String),

    #[error("invalid backend URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A dashboard aggregation in which at least one request failed.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(
        "{} of 6 dashboard requests failed (first: {})",
        .failures.len(),
        first_failure(.failures)
    )]
    Aggregation {
        failures: Vec<(&'static str, ApiError)>,
    },
}

fn first_failure(failures: &[(&'static str, ApiError)]) -> String {
    failures
        .first()
        .map(|(endpoint, err)| format!("{endpoint}: {err}"))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session, sign in first")]
    NotSignedIn,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    InvalidShop(#[from] ShopDomainError),

    #[error("callback is missing the code or shop parameter")]
    MissingCallbackParams,

    #[error("an account already exists for this shop")]
    AccountExists,

    #[error("backend rejected the request")]
    Rejected,

    #[error(transparent)]
    Api(#[from] ApiError),
}
