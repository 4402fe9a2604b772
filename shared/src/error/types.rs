//! Application error type

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error type handed to hosts embedding the checkout core:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (field-level errors, amounts, ids)
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::SaleNotFound);
        assert_eq!(err.code, ErrorCode::SaleNotFound);
        assert_eq!(err.message, "Sale not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing reference")
            .with_detail("field", "reference")
            .with_detail("method", "Yape");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "reference");
        assert_eq!(details.get("method").unwrap(), "Yape");
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        let err = AppError::not_found("Client");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Client not found");
        assert!(err.details.as_ref().unwrap().contains_key("resource"));

        let err = AppError::permission_denied("orders:refund required");
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let err = AppError::internal("boom");
        assert_eq!(err.code, ErrorCode::InternalError);

        let err = AppError::invalid_credentials();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::ProductOutOfStock, "Only 2 left");
        assert_eq!(format!("{}", err), "Only 2 left");
    }

    #[test]
    fn test_app_error_serialize() {
        let err = AppError::new(ErrorCode::WalletInsufficientBalance);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":5008"));
        assert!(!json.contains("details"));
    }
}
