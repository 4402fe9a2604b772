//! Checkout building blocks
//!
//! Transient, UI-side state that exists only while a sale, purchase or
//! service is being rung up. Nothing in here touches the store; the store's
//! commands consume a finished [`Cart`] and [`PaymentCollector`].

mod cart;
mod payments;
mod price_override;
mod ticket;

pub use cart::{Cart, CartContext, StockSource};
pub use payments::{CollectorState, PaymentCollector, PaymentInput, bucket_payments};
pub use price_override::{GateState, PriceAuthorizer, PriceOverrideGate, PriceOverrideGrant};
pub use ticket::Ticket;
pub(crate) use ticket::local_date_time;
