//! Error types module
//!
//! All client-side errors are unified under the `AppError` enum, which can
//! represent validation, image processing, and API failures. `ErrorMetadata`
//! lets callers decide how to log and present each variant.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error presentation - how an error should be reported.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "PAYLOAD_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (the user can retry)
    fn is_recoverable(&self) -> bool;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl AppError {
    /// True when the failure means the payload was rejected for its size,
    /// either as a local limit or an HTTP 413 from the backend.
    pub fn is_payload_too_large(&self) -> bool {
        matches!(
            self,
            AppError::PayloadTooLarge(_) | AppError::Api { status: 413, .. }
        )
    }
}

/// Static metadata per variant: (error_code, recoverable, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (&'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => ("INVALID_INPUT", false, LogLevel::Debug),
        AppError::ImageProcessing(_) => ("IMAGE_PROCESSING_ERROR", false, LogLevel::Warn),
        AppError::PayloadTooLarge(_) => ("PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::Api { .. } => ("API_ERROR", true, LogLevel::Warn),
        AppError::Internal(_) => ("INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::ImageProcessing(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Internal(_) => "Internal error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_invalid_input() {
        let err = AppError::InvalidInput("bad payer name".to_string());
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "bad payer name");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_payload_too_large() {
        let err = AppError::PayloadTooLarge("12 MB exceeds 10 MB limit".to_string());
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert!(err.client_message().contains("10 MB"));
    }

    #[test]
    fn test_error_metadata_internal_hides_detail() {
        let err = AppError::Internal("socket closed unexpectedly".to_string());
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Internal error");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_api() {
        let err = AppError::Api {
            status: 413,
            message: "payload too large".to_string(),
        };
        assert_eq!(err.error_code(), "API_ERROR");
        assert!(err.to_string().contains("413"));
    }

    #[test]
    fn test_is_payload_too_large() {
        assert!(AppError::PayloadTooLarge("big".to_string()).is_payload_too_large());
        assert!(AppError::Api {
            status: 413,
            message: "big".to_string()
        }
        .is_payload_too_large());
        assert!(!AppError::Api {
            status: 500,
            message: "boom".to_string()
        }
        .is_payload_too_large());
        assert!(!AppError::Internal("x".to_string()).is_payload_too_large());
    }
}
