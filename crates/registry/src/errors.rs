//! Registry error types and classification
//!
//! Every catalog operation returns `Result<T, ApiError>` regardless of verb;
//! non-success HTTP responses keep the raw body so callers can inspect what
//! the registry said. Categories drive retry decisions and user-facing
//! messaging.

use plumage_common::auth::AuthError;
use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for registry operations.
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Error produced by catalog operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The registry answered with a non-success status. The body is kept
    /// verbatim.
    #[error("registry answered HTTP {status}: {body}")]
    Status {
        /// HTTP status the registry answered with.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// Token acquisition failed before the request went out.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure (DNS, connect, TLS, broken pipe).
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded its deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode registry response: {0}")]
    Decode(String),

    /// Client-side configuration problem (bad endpoint, missing settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invariant violation inside the client itself.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error category for external consumption
///
/// Classifies errors by type to enable appropriate retry strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication or authorization failed (401, 403, token errors)
    Authentication,

    /// Rate limit exceeded (429)
    RateLimited,

    /// Invalid request or data (4xx except 401, 403, 429)
    Validation,

    /// Registry is unavailable (5xx errors)
    ServerUnavailable,

    /// Network is offline or unreachable
    NetworkOffline,

    /// Network request timed out
    NetworkTimeout,

    /// Unknown or unclassified error
    Unknown,
}

impl ApiErrorCategory {
    /// Returns true if this error type should be retried
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkOffline
                | Self::NetworkTimeout
                | Self::ServerUnavailable
                | Self::RateLimited
        )
    }
}

impl std::fmt::Display for ApiErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentication => write!(f, "Authentication Failed"),
            Self::RateLimited => write!(f, "Rate Limited"),
            Self::Validation => write!(f, "Validation Error"),
            Self::ServerUnavailable => write!(f, "Server Unavailable"),
            Self::NetworkOffline => write!(f, "Network Offline"),
            Self::NetworkTimeout => write!(f, "Network Timeout"),
            Self::Unknown => write!(f, "Unknown Error"),
        }
    }
}

impl ApiError {
    /// Classify this error for retry and messaging decisions.
    #[must_use]
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Status { status, .. } => classify_status(*status),
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Network(_) => ApiErrorCategory::NetworkOffline,
            Self::Timeout(_) => ApiErrorCategory::NetworkTimeout,
            Self::Decode(_) | Self::Config(_) | Self::Internal(_) => ApiErrorCategory::Unknown,
        }
    }

    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// HTTP status of the response, when the registry produced one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn classify_status(status: StatusCode) -> ApiErrorCategory {
    match status.as_u16() {
        401 | 403 => ApiErrorCategory::Authentication,
        429 => ApiErrorCategory::RateLimited,
        400..=499 => ApiErrorCategory::Validation,
        500..=599 => ApiErrorCategory::ServerUnavailable,
        _ => ApiErrorCategory::Unknown,
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("failed to connect to registry: {err}"))
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err.to_string())
    }
}
