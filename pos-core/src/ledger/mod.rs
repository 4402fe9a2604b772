//! Cash ledger aggregation
//!
//! Pure derivations over the append-only [`CashMovement`] list, plus
//! [`RunningBalances`], the materialized per-method totals the store keeps
//! in step with every append.
//!
//! [`CashMovement`]: shared::models::CashMovement

mod balance;
mod query;
mod running;
mod summary;

pub use balance::{BucketFilter, balance_for, balance_where};
pub use query::LedgerQuery;
pub use running::RunningBalances;
pub use summary::{LedgerSummary, Totals, summarize};
