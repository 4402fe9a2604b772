//! Store events
//!
//! Actions validate against a read-only [`CommandContext`](super::CommandContext)
//! and describe their effect as events; appliers then write them to the
//! state without any further checks.

use shared::models::{
    CashMovement, CashSession, CreditNote, PurchaseRecord, SaleRecord, ServiceOrder,
    StockMovement,
};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Product stock set to `movement.current_stock`
    StockAdjusted(StockMovement),
    ProductCostUpdated { product_id: String, cost: f64 },
    CashRecorded(CashMovement),
    WalletAdjusted {
        client_id: String,
        delta: f64,
        balance_after: f64,
    },
    SaleRecorded(SaleRecord),
    PurchaseRecorded(PurchaseRecord),
    /// Inserted, or replaced by id
    ServiceOrderSaved(ServiceOrder),
    CreditNoteRecorded(CreditNote),
    /// Inserted, or replaced by id
    CashSessionSaved(CashSession),
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StockAdjusted(_) => "StockAdjusted",
            Self::ProductCostUpdated { .. } => "ProductCostUpdated",
            Self::CashRecorded(_) => "CashRecorded",
            Self::WalletAdjusted { .. } => "WalletAdjusted",
            Self::SaleRecorded(_) => "SaleRecorded",
            Self::PurchaseRecorded(_) => "PurchaseRecorded",
            Self::ServiceOrderSaved(_) => "ServiceOrderSaved",
            Self::CreditNoteRecorded(_) => "CreditNoteRecorded",
            Self::CashSessionSaved(_) => "CashSessionSaved",
        }
    }
}
