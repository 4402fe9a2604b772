use super::EventApplier;
use crate::store::{StoreEvent, StoreState};

/// Appends the row and folds it into the running balances
pub struct CashRecordedApplier;

impl EventApplier for CashRecordedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::CashRecorded(movement) = event {
            state.balances.record(movement);
            state.cash_movements.push(movement.clone());
        }
    }
}

pub struct WalletAdjustedApplier;

impl EventApplier for WalletAdjustedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::WalletAdjusted {
            client_id,
            balance_after,
            ..
        } = event
        {
            if let Some(client) = state.clients.iter_mut().find(|c| &c.id == client_id) {
                client.digital_balance = *balance_after;
            }
        }
    }
}
