//! Error types for vManage operations.
//!
//! This module provides the error hierarchy shared by every vManage API crate,
//! including HTTP status code mapping and structured error responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for vManage operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// vManage is unavailable or returned a transient failure
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Login or authorization failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Failed to parse a vManage response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid UUID format
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for vManage: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Model validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Endpoint is not available on the connected vManage version
    #[error("Endpoint {endpoint} requires version {required}, server runs {actual}")]
    UnsupportedVersion {
        /// Endpoint path template
        endpoint: String,
        /// Version constraint declared by the endpoint
        required: String,
        /// Version reported by the server
        actual: String,
    },

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for vManage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
    /// Optional request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail structure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error envelope returned by vManage on failed requests.
///
/// ```json
/// {"error": {"message": "Failed to create list", "details": "List name already exists", "code": "POLICY0001"}}
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VmanageErrorEnvelope {
    /// Error body
    pub error: VmanageErrorBody,
}

/// Body of a vManage error envelope.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VmanageErrorBody {
    /// Short message
    #[serde(default)]
    pub message: Option<String>,
    /// Longer explanation
    #[serde(default)]
    pub details: Option<String>,
    /// vManage error code
    #[serde(default)]
    pub code: Option<String>,
}

impl VmanageErrorEnvelope {
    /// Try to decode an error envelope from a response body.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Render a single-line description of the error.
    #[must_use]
    pub fn describe(&self) -> String {
        let body = &self.error;
        let mut parts = Vec::new();
        if let Some(code) = &body.code {
            parts.push(format!("[{code}]"));
        }
        if let Some(message) = &body.message {
            parts.push(message.clone());
        }
        if let Some(details) = &body.details {
            parts.push(format!("({details})"));
        }
        parts.join(" ")
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Authentication(_) => "AUTHENTICATION_FAILED",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidUuid(_) => "INVALID_UUID",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::UnsupportedVersion { .. } => "UNSUPPORTED_VERSION",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        self.into_error_response_with_id(None)
    }

    /// Converts the error into an `ErrorResponse` with a request ID.
    #[must_use]
    pub fn into_error_response_with_id(self, request_id: Option<String>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: None,
            },
            request_id,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::InternalError(_) | Self::ConfigError(_) | Self::Authentication(_)
        )
    }

    /// Returns true if the request that produced this error may be retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::ServiceUnavailable(_) | Self::HttpError(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidUuid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::Authentication("test".to_string()).error_code(),
            "AUTHENTICATION_FAILED"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            Error::ValidationError("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            Error::UnsupportedVersion {
                endpoint: "/tenantmigration/import".to_string(),
                required: "<20.13".to_string(),
                actual: "20.13.1".to_string(),
            }
            .error_code(),
            "UNSUPPORTED_VERSION"
        );
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedVersion {
            endpoint: "/tenantmigration/import".to_string(),
            required: "<20.13".to_string(),
            actual: "20.13.1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Endpoint /tenantmigration/import requires version <20.13, server runs 20.13.1"
        );
    }

    #[test]
    fn test_into_error_response() {
        let err = Error::NotFound("list-123".to_string());
        let response = err.clone().into_error_response();

        assert_eq!(response.error.code, "NOT_FOUND");
        assert_eq!(response.error.message, "Not found: list-123");
        assert!(response.request_id.is_none());

        let response_with_id = err.into_error_response_with_id(Some("req-456".to_string()));
        assert_eq!(response_with_id.request_id, Some("req-456".to_string()));
    }

    #[test]
    fn test_should_log_and_transient() {
        assert!(Error::InternalError("test".to_string()).should_log());
        assert!(Error::Authentication("test".to_string()).should_log());
        assert!(!Error::NotFound("test".to_string()).should_log());

        assert!(Error::Timeout("t".to_string()).is_transient());
        assert!(Error::ServiceUnavailable("t".to_string()).is_transient());
        assert!(!Error::BadRequest("t".to_string()).is_transient());
    }

    #[test]
    fn test_vmanage_error_envelope() {
        let body = r#"{"error":{"message":"Failed to create list","details":"List name already exists","code":"POLICY0001"}}"#;
        let envelope = VmanageErrorEnvelope::parse(body).unwrap();
        assert_eq!(
            envelope.describe(),
            "[POLICY0001] Failed to create list (List name already exists)"
        );

        assert!(VmanageErrorEnvelope::parse("<html>login</html>").is_none());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let converted: Error = err.into();
        assert!(matches!(converted, Error::ParseError(_)));
    }

    #[test]
    fn test_from_uuid_error() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let converted: Error = err.into();
        assert_eq!(converted.error_code(), "INVALID_UUID");
    }
}
