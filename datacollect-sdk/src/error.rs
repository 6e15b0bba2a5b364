//! SDK error types and handling
//!
//! Non-2xx responses are mapped to typed variants that keep the service's
//! error messages, so tests can assert on the exact text the service reports.

use datacollect_core::ApiErrorBody;
use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// API returned an error response not covered by a dedicated variant
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<String>,
    },

    /// Network or connection error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// 401
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// 403
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// 404
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 409, e.g. a uniqueness violation
    #[error("Conflict: {message}")]
    Conflict { message: String, errors: Vec<String> },

    /// 400 / 422
    #[error("Validation error: {message}")]
    Validation { message: String, errors: Vec<String> },

    /// 5xx
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

impl SdkError {
    /// Create an error from a non-success status and its body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let ApiErrorBody { message, errors } = ApiErrorBody::from_body(body);

        match status {
            400 | 422 => SdkError::Validation { message, errors },
            401 => SdkError::Unauthorized(message),
            403 => SdkError::Forbidden(message),
            404 => SdkError::NotFound(message),
            409 => SdkError::Conflict { message, errors },
            500..=599 => SdkError::Server(message),
            _ => SdkError::Api {
                status,
                message,
                errors,
            },
        }
    }

    /// True for failures that may go away on a second attempt: 5xx answers,
    /// timeouts and requests that never reached the service.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::Network(e) => e.is_connect() || e.is_request() || e.is_timeout(),
            SdkError::Timeout(_) | SdkError::Server(_) => true,
            _ => false,
        }
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Unauthorized(_) => Some(401),
            SdkError::Forbidden(_) => Some(403),
            SdkError::NotFound(_) => Some(404),
            SdkError::Conflict { .. } => Some(409),
            SdkError::Validation { .. } => Some(400),
            SdkError::Server(_) => Some(500),
            SdkError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// All messages the service reported with this error.
    pub fn messages(&self) -> Vec<&str> {
        let (message, errors): (&str, &[String]) = match self {
            SdkError::Api {
                message, errors, ..
            }
            | SdkError::Conflict { message, errors }
            | SdkError::Validation { message, errors } => (message.as_str(), errors.as_slice()),
            SdkError::Unauthorized(m)
            | SdkError::Forbidden(m)
            | SdkError::NotFound(m)
            | SdkError::Server(m) => (m.as_str(), &[]),
            _ => return Vec::new(),
        };

        std::iter::once(message)
            .filter(|m| !m.is_empty())
            .chain(errors.iter().map(String::as_str))
            .collect()
    }

    /// True when any reported message contains `fragment`.
    pub fn mentions(&self, fragment: &str) -> bool {
        self.messages().iter().any(|m| m.contains(fragment))
    }
}
