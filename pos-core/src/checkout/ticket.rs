use chrono::{FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use shared::models::{CartItem, PaymentDetail, SaleRecord};

/// Receipt view-model returned by a finalized sale
///
/// Not persisted; the sale record is the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub order_id: i64,
    /// Local date, `YYYY-MM-DD`
    pub date: String,
    /// Local time, `HH:MM:SS`
    pub time: String,
    pub client: Option<String>,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub detailed_payments: Vec<PaymentDetail>,
    pub change: f64,
    pub cashier: String,
}

impl Ticket {
    pub fn from_sale(sale: &SaleRecord, offset: FixedOffset) -> Self {
        let (date, time) = local_date_time(sale.timestamp, offset);
        Self {
            order_id: sale.id,
            date,
            time,
            client: sale.client_name.clone(),
            items: sale.items.clone(),
            total: sale.total,
            detailed_payments: sale.detailed_payments.clone(),
            change: sale.change,
            cashier: sale.user.clone(),
        }
    }
}

/// Format a millisecond timestamp as local `(date, time)` strings
pub(crate) fn local_date_time(timestamp_millis: i64, offset: FixedOffset) -> (String, String) {
    match offset.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => (
            dt.format("%Y-%m-%d").to_string(),
            dt.format("%H:%M:%S").to_string(),
        ),
        None => (String::new(), String::new()),
    }
}
