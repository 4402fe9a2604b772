//! Purchase Model

use super::{CartItem, PaymentBreakdown, PaymentDetail};
use serde::{Deserialize, Serialize};

/// Stock purchase from a supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: i64,
    pub timestamp: i64,
    pub supplier: String,
    /// Supplier invoice / guide number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// `unit_price` holds the purchase cost
    pub items: Vec<CartItem>,
    pub total: f64,
    pub payment_breakdown: PaymentBreakdown,
    pub detailed_payments: Vec<PaymentDetail>,
    pub user: String,
}
