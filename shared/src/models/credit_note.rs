//! Credit Note Model

use super::PaymentBreakdown;
use serde::{Deserialize, Serialize};

/// Returned line, priced at the original sale's unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnedItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

/// Partial or total reversal of a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditNote {
    pub id: i64,
    pub sale_id: i64,
    pub timestamp: i64,
    pub reason: String,
    pub items: Vec<ReturnedItem>,
    pub total: f64,
    /// How the refund left the store, per bucket
    pub refund_breakdown: PaymentBreakdown,
    pub user: String,
}
