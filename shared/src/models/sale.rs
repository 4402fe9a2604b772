//! Sale Model

use super::{PaymentBreakdown, PaymentDetail};
use serde::{Deserialize, Serialize};

/// Cart line snapshot
///
/// `total == quantity * unit_price`; the unit price may differ from the
/// catalog price after an authorized override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub code: String,
    pub name: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub total: f64,
}

/// Finalized sale, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Ticket number
    pub id: i64,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub payment_breakdown: PaymentBreakdown,
    pub detailed_payments: Vec<PaymentDetail>,
    /// Change handed back in cash
    pub change: f64,
    pub user: String,
}
