use super::EventApplier;
use crate::store::{StoreEvent, StoreState};

pub struct StockAdjustedApplier;

impl EventApplier for StockAdjustedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::StockAdjusted(movement) = event {
            if let Some(product) = state
                .products
                .iter_mut()
                .find(|p| p.id == movement.product_id)
            {
                product.stock = movement.current_stock;
            }
            state.stock_movements.push(movement.clone());
        }
    }
}

pub struct ProductCostUpdatedApplier;

impl EventApplier for ProductCostUpdatedApplier {
    fn apply(&self, state: &mut StoreState, event: &StoreEvent) {
        if let StoreEvent::ProductCostUpdated { product_id, cost } = event {
            if let Some(product) = state.products.iter_mut().find(|p| &p.id == product_id) {
                product.cost = Some(*cost);
            }
        }
    }
}
