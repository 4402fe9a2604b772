//! Unified error codes for the checkout core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Sale errors
//! - 5xxx: Payment errors
//! - 6xxx: Product / stock errors
//! - 7xxx: Service order and cash session errors
//! - 8xxx: Client errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/PIN)
    InvalidCredentials = 1002,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// A supervisor authorization is required before this operation
    AuthorizationRequired = 2006,

    // ==================== 4xxx: Sale ====================
    /// Sale not found
    SaleNotFound = 4001,
    /// Sale has no items
    SaleEmpty = 4007,
    /// Sale has already been fully returned
    SaleAlreadyReturned = 4008,
    /// Returned quantity exceeds what is still returnable
    ReturnExceedsSold = 4009,
    /// Command id was already processed
    CommandAlreadyProcessed = 4010,

    // ==================== 5xxx: Payment ====================
    /// Insufficient payment amount
    PaymentInsufficientAmount = 5002,
    /// Invalid payment method for this operation
    PaymentInvalidMethod = 5003,
    /// Refund amount exceeds what was paid
    PaymentRefundExceedsAmount = 5005,
    /// Payment amount is not a positive finite number
    PaymentInvalidAmount = 5006,
    /// Destination account and operation reference are required
    PaymentReferenceRequired = 5007,
    /// Client store credit is not enough
    WalletInsufficientBalance = 5008,
    /// Payment entry not found
    PaymentNotFound = 5009,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product has invalid price
    ProductInvalidPrice = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Quantity is not valid
    InvalidQuantity = 6004,
    /// Cart line not found
    CartItemNotFound = 6005,

    // ==================== 7xxx: Service / Cash ====================
    /// Service order not found
    ServiceOrderNotFound = 7201,
    /// Service order status transition is not allowed
    InvalidStatusTransition = 7202,
    /// No cash session is open
    CashSessionNotOpen = 7301,
    /// A cash session is already open
    CashSessionAlreadyOpen = 7302,

    // ==================== 8xxx: Client ====================
    /// Client not found
    ClientNotFound = 8005,
    /// Bank account not found
    BankAccountNotFound = 8006,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage error
    StorageError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Storage corrupted (snapshot unreadable)
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Numeric value of the code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default English message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or PIN",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AuthorizationRequired => "Supervisor authorization is required",

            // Sale
            ErrorCode::SaleNotFound => "Sale not found",
            ErrorCode::SaleEmpty => "Sale has no items",
            ErrorCode::SaleAlreadyReturned => "Sale has already been fully returned",
            ErrorCode::ReturnExceedsSold => "Returned quantity exceeds sold quantity",
            ErrorCode::CommandAlreadyProcessed => "Command has already been processed",

            // Payment
            ErrorCode::PaymentInsufficientAmount => "Insufficient payment amount",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentRefundExceedsAmount => "Refund amount exceeds original payment",
            ErrorCode::PaymentInvalidAmount => "Payment amount must be a positive number",
            ErrorCode::PaymentReferenceRequired => {
                "Destination account and operation reference are required"
            }
            ErrorCode::WalletInsufficientBalance => "Insufficient store credit",
            ErrorCode::PaymentNotFound => "Payment not found",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::InvalidQuantity => "Invalid quantity",
            ErrorCode::CartItemNotFound => "Cart item not found",

            // Service / Cash
            ErrorCode::ServiceOrderNotFound => "Service order not found",
            ErrorCode::InvalidStatusTransition => "Status transition is not allowed",
            ErrorCode::CashSessionNotOpen => "No cash session is open",
            ErrorCode::CashSessionAlreadyOpen => "A cash session is already open",

            // Client
            ErrorCode::ClientNotFound => "Client not found",
            ErrorCode::BankAccountNotFound => "Bank account not found",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageCorrupted => "Storage corrupted (snapshot unreadable)",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2006 => Ok(ErrorCode::AuthorizationRequired),

            // Sale
            4001 => Ok(ErrorCode::SaleNotFound),
            4007 => Ok(ErrorCode::SaleEmpty),
            4008 => Ok(ErrorCode::SaleAlreadyReturned),
            4009 => Ok(ErrorCode::ReturnExceedsSold),
            4010 => Ok(ErrorCode::CommandAlreadyProcessed),

            // Payment
            5002 => Ok(ErrorCode::PaymentInsufficientAmount),
            5003 => Ok(ErrorCode::PaymentInvalidMethod),
            5005 => Ok(ErrorCode::PaymentRefundExceedsAmount),
            5006 => Ok(ErrorCode::PaymentInvalidAmount),
            5007 => Ok(ErrorCode::PaymentReferenceRequired),
            5008 => Ok(ErrorCode::WalletInsufficientBalance),
            5009 => Ok(ErrorCode::PaymentNotFound),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6004 => Ok(ErrorCode::InvalidQuantity),
            6005 => Ok(ErrorCode::CartItemNotFound),

            // Service / Cash
            7201 => Ok(ErrorCode::ServiceOrderNotFound),
            7202 => Ok(ErrorCode::InvalidStatusTransition),
            7301 => Ok(ErrorCode::CashSessionNotOpen),
            7302 => Ok(ErrorCode::CashSessionAlreadyOpen),

            // Client
            8005 => Ok(ErrorCode::ClientNotFound),
            8006 => Ok(ErrorCode::BankAccountNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9005 => Ok(ErrorCode::ConfigError),
            9403 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
