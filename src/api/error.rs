//! Error types for the learning backend

use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP request failed (backend unreachable, connection reset, ...)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the body, if any
        message: String,
    },

    /// The backend answered 200 with an `{error}` payload
    #[error("Backend error: {0}")]
    Backend(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the user can simply try again later
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApiError::Request(_) | ApiError::Status { status: 500..=599, .. })
    }

    /// Whether the backend rejected the user's credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let unauthorized = ApiError::Status { status: 401, message: "Invalid credentials".into() };
        assert!(unauthorized.is_unauthorized());
        assert!(!unauthorized.is_recoverable());

        let server = ApiError::Status { status: 503, message: String::new() };
        assert!(server.is_recoverable());
        assert!(!ApiError::Backend("nope".into()).is_recoverable());
    }

    #[test]
    fn messages_include_backend_text() {
        let err = ApiError::Status { status: 400, message: "User already exists".into() };
        assert_eq!(err.to_string(), "Backend error (400): User already exists");
    }
}
