use super::EventApplier;
use crate::store::{StoreEvent, StoreState};

pub struct SaleRecordedApplier;

impl EventApplier for SaleRecordedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::SaleRecorded(sale) = event {
            state.next_ticket = state.next_ticket.max(sale.id + 1);
            state.sales.push(sale.clone());
        }
    }
}

pub struct PurchaseRecordedApplier;

impl EventApplier for PurchaseRecordedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::PurchaseRecorded(purchase) = event {
            state.purchases.push(purchase.clone());
        }
    }
}

pub struct CreditNoteRecordedApplier;

impl EventApplier for CreditNoteRecordedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::CreditNoteRecorded(note) = event {
            state.credit_notes.push(note.clone());
        }
    }
}

pub struct ServiceOrderSavedApplier;

impl EventApplier for ServiceOrderSavedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::ServiceOrderSaved(order) = event {
            match state.service_orders.iter_mut().find(|o| o.id == order.id) {
                Some(existing) => *existing = order.clone(),
                None => state.service_orders.push(order.clone()),
            }
        }
    }
}

pub struct CashSessionSavedApplier;

impl EventApplier for CashSessionSavedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::CashSessionSaved(session) = event {
            match state.cash_sessions.iter_mut().find(|s| s.id == session.id) {
                Some(existing) => *existing = session.clone(),
                None => state.cash_sessions.push(session.clone()),
            }
        }
    }
}
