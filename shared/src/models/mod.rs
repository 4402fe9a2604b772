//! Data models
//!
//! Plain serde types exchanged between the checkout core and its host.
//! Catalog, client and bank account ids are the host's `String` ids; records
//! created by the core carry `i64` ids (ticket numbers or snowflakes).
//! Money is stored as `f64`; all arithmetic on it happens in `pos-core`
//! through `rust_decimal`.

pub mod bank_account;
pub mod cash_movement;
pub mod cash_session;
pub mod client;
pub mod credit_note;
pub mod payment;
pub mod product;
pub mod purchase;
pub mod sale;
pub mod service_order;
pub mod stock_movement;

// Re-exports
pub use bank_account::*;
pub use cash_movement::*;
pub use cash_session::*;
pub use client::*;
pub use credit_note::*;
pub use payment::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
pub use service_order::*;
pub use stock_movement::*;
