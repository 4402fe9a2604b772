//! POS checkout and ledger reconciliation core
//!
//! Turns a cart plus a set of heterogeneous partial payments into a
//! finalized sale, updated stock and updated cash / wallet balances.
//!
//! # Modules
//!
//! ```text
//! pos-core/src/
//! ├── core/       # Configuration
//! ├── common/     # Logging
//! ├── auth/       # Operators, permissions, staff PINs
//! ├── checkout/   # Cart, payment collector, price-override gate, ticket
//! ├── store/      # Store orchestrator: commands, events, snapshots
//! ├── ledger/     # Balance derivation over cash movements
//! └── money.rs    # Decimal money arithmetic
//! ```
//!
//! # Data flow
//!
//! 1. The cashier fills a [`Cart`] and a [`PaymentCollector`]
//! 2. [`Store::process_sale`] validates both and commits the sale
//! 3. Stock movements, cash movements and the sale record are appended
//! 4. [`ledger`] functions derive balances from the cash movements

pub mod auth;
pub mod checkout;
pub mod common;
pub mod core;
pub mod ledger;
pub mod money;
pub mod store;

pub use auth::{Operator, StaffDirectory};
pub use checkout::{Cart, CartContext, PaymentCollector, PaymentInput, PriceOverrideGate, Ticket};
pub use core::{CheckoutSettings, Config};
pub use ledger::{BucketFilter, LedgerQuery, balance_for};
pub use store::{CheckoutError, CheckoutResult, CommandMetadata, Store};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use common::logger::{cleanup_old_logs, init_logger};

/// Start logging for `config`; rotating log files are written in production only
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    let log_dir = config.log_dir();
    let file_logs = if config.is_production() {
        Some(log_dir.as_path())
    } else {
        None
    };
    init_logger(&config.log_level, config.log_json, file_logs)
}
