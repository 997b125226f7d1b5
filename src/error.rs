use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain a listing page. Extraction never runs after one of these.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Transport problems, throttling and server errors are worth another attempt.
    /// A URL that can't even be turned into a request is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Client(_) => false,
            FetchError::Request { source, .. } => !source.is_builder(),
            FetchError::Body { .. } => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
        }
    }
}
