//! Event applier implementations
//!
//! Each applier implements [`EventApplier`] for one event type. Appliers
//! only write; all validation happened in the action.

use enum_dispatch::enum_dispatch;

use super::{StoreEvent, StoreState};

mod inventory;
mod ledger;
mod records;

pub use inventory::{ProductCostUpdatedApplier, StockAdjustedApplier};
pub use ledger::{CashRecordedApplier, WalletAdjustedApplier};
pub use records::{
    CashSessionSavedApplier, CreditNoteRecordedApplier, PurchaseRecordedApplier,
    SaleRecordedApplier, ServiceOrderSavedApplier,
};

/// Writes one kind of event to the state; never fails
///
/// Keep above [`EventAction`]: the dispatch impl is expanded here.
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent);
}

/// EventAction enum - dispatches to concrete applier implementations
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    StockAdjusted(StockAdjustedApplier),
    ProductCostUpdated(ProductCostUpdatedApplier),
    CashRecorded(CashRecordedApplier),
    WalletAdjusted(WalletAdjustedApplier),
    SaleRecorded(SaleRecordedApplier),
    PurchaseRecorded(PurchaseRecordedApplier),
    ServiceOrderSaved(ServiceOrderSavedApplier),
    CreditNoteRecorded(CreditNoteRecordedApplier),
    CashSessionSaved(CashSessionSavedApplier),
}

/// The only place with a match on the event type
impl From<&StoreEvent> for EventAction {
    fn from(event: &StoreEvent) -> Self {
        match event {
            StoreEvent::StockAdjusted(_) => StockAdjustedApplier.into(),
            StoreEvent::ProductCostUpdated { .. } => ProductCostUpdatedApplier.into(),
            StoreEvent::CashRecorded(_) => CashRecordedApplier.into(),
            StoreEvent::WalletAdjusted { .. } => WalletAdjustedApplier.into(),
            StoreEvent::SaleRecorded(_) => SaleRecordedApplier.into(),
            StoreEvent::PurchaseRecorded(_) => PurchaseRecordedApplier.into(),
            StoreEvent::ServiceOrderSaved(_) => ServiceOrderSavedApplier.into(),
            StoreEvent::CreditNoteRecorded(_) => CreditNoteRecordedApplier.into(),
            StoreEvent::CashSessionSaved(_) => CashSessionSavedApplier.into(),
        }
    }
}

/// Apply events in order
pub fn apply_all(state: &mut StoreState, events: &[StoreEvent]) {
    for event in events {
        tracing::debug!(event = event.name(), "Applying event");
        EventAction::from(event).apply(state, event);
    }
}
