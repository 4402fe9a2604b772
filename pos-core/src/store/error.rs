use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Checkout domain errors
///
/// Every variant carries the [`ErrorCode`] reported to the host. A failed
/// command never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    /// Malformed or out-of-range input
    #[error("Validation failed: {1}")]
    Validation(ErrorCode, String),

    /// Wrong credentials or missing permission
    #[error("Not authorized: {1}")]
    Authorization(ErrorCode, String),

    /// Operation not allowed in the current state
    #[error("Precondition failed: {1}")]
    Precondition(ErrorCode, String),

    #[error("Not found: {1}")]
    NotFound(ErrorCode, String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(code, _)
            | Self::Authorization(code, _)
            | Self::Precondition(code, _)
            | Self::NotFound(code, _) => *code,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(..) => "validation",
            Self::Authorization(..) => "authorization",
            Self::Precondition(..) => "precondition",
            Self::NotFound(..) => "not_found",
            Self::Internal(_) => "internal",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(_, msg)
            | Self::Authorization(_, msg)
            | Self::Precondition(_, msg)
            | Self::NotFound(_, msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        let kind = err.kind();
        match err {
            CheckoutError::Validation(code, msg)
            | CheckoutError::Authorization(code, msg)
            | CheckoutError::Precondition(code, msg)
            | CheckoutError::NotFound(code, msg) => {
                AppError::with_message(code, msg).with_detail("kind", kind)
            }
            CheckoutError::Internal(msg) => AppError::internal(msg),
        }
    }
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_is_preserved() {
        let err = CheckoutError::Validation(
            ErrorCode::WalletInsufficientBalance,
            "Saldo Favor exceeds available credit".to_string(),
        );
        assert_eq!(err.code(), ErrorCode::WalletInsufficientBalance);
        assert_eq!(err.kind(), "validation");
        assert_eq!(err.message(), "Saldo Favor exceeds available credit");
    }

    #[test]
    fn test_into_app_error() {
        let err = CheckoutError::Precondition(
            ErrorCode::PaymentInsufficientAmount,
            "Remaining 4.00".to_string(),
        );
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::PaymentInsufficientAmount);
        assert_eq!(app.message, "Remaining 4.00");
        assert_eq!(app.details.unwrap().get("kind").unwrap(), "precondition");

        let app: AppError = CheckoutError::Internal("hash failure".into()).into();
        assert_eq!(app.code, ErrorCode::InternalError);
    }
}
