//! Shared types for the POS checkout core
//!
//! Plain data model used by the checkout core and by any host embedding it:
//! catalog, clients, payments, ledger rows, historical records, plus the
//! unified error codes.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
