//! ProcessPurchase command handler
//!
//! Receives stock from a supplier and pays for it out of the ledger.

use super::settlement::{Payer, Settlement};
use crate::checkout::{Cart, CartContext, PaymentCollector};
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandHandler, CommandMetadata, StoreEvent,
};
use shared::error::ErrorCode;
use shared::models::{MovementKind, PurchaseRecord, categories};

#[derive(Debug)]
pub struct ProcessPurchaseAction<'a> {
    pub cart: &'a Cart,
    pub payments: &'a PaymentCollector,
    pub supplier: &'a str,
    pub document: Option<&'a str>,
}

impl CommandHandler for ProcessPurchaseAction<'_> {
    fn name(&self) -> &'static str {
        "process_purchase"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        // 1. Validate cart and supplier
        if self.cart.context() != CartContext::Purchase {
            return Err(CheckoutError::Validation(
                ErrorCode::InvalidRequest,
                format!("Cannot purchase with a {:?} cart", self.cart.context()),
            ));
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::Precondition(
                ErrorCode::SaleEmpty,
                "Purchase has no items".to_string(),
            ));
        }
        let supplier = self.supplier.trim();
        if supplier.is_empty() {
            return Err(CheckoutError::Validation(
                ErrorCode::RequiredField,
                "Supplier is required".to_string(),
            ));
        }
        let total = self.cart.total();

        // 2. Settle payments; store credit never pays a supplier
        let settlement = Settlement::resolve(ctx, self.payments, total, Payer::Store)?;

        // 3. Stock in and cost update per line
        let id = ctx.next_id();
        let reference = format!("Compra #{}", id);
        let mut events = Vec::new();
        for item in self.cart.items() {
            events.push(ctx.put_stock(&item.product_id, item.quantity, &reference, metadata)?);
            events.push(StoreEvent::ProductCostUpdated {
                product_id: item.product_id.clone(),
                cost: item.unit_price,
            });
        }

        // 4. Money out
        events.extend(settlement.ledger_events(
            ctx,
            MovementKind::Egreso,
            categories::PURCHASE,
            &reference,
            &id.to_string(),
            metadata,
        ));

        // 5. Purchase record
        events.push(StoreEvent::PurchaseRecorded(PurchaseRecord {
            id,
            timestamp: metadata.timestamp,
            supplier: supplier.to_string(),
            document: self
                .document
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            items: self.cart.items().to_vec(),
            total,
            payment_breakdown: settlement.breakdown,
            detailed_payments: settlement.payments,
            user: metadata.operator_name().to_string(),
        }));

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Operator;
    use crate::checkout::PaymentInput;
    use crate::core::CheckoutSettings;
    use crate::store::StoreState;
    use shared::models::{PaymentMethod, Product};

    fn metadata() -> CommandMetadata {
        CommandMetadata::new(&Operator::with_role(1, "admin", "Admin", "admin")).at(5_000)
    }

    fn state() -> StoreState {
        let mut cable = Product::new("p1", "Cable HDMI", 15.0, 0);
        cable.cost = Some(6.0);
        StoreState::new(vec![cable], vec![], vec![])
    }

    #[test]
    fn test_purchase_receives_stock_and_pays_out() {
        let state = state();
        let settings = CheckoutSettings::default();
        let mut ctx = CommandContext::new(&state, &settings);

        let mut cart = Cart::new(CartContext::Purchase);
        cart.add_item(&state.products[0]).unwrap();
        cart.add_item(&state.products[0]).unwrap();
        let mut payments = PaymentCollector::new(cart.total());
        payments.add_payment(PaymentInput::cash(12.0)).unwrap();

        let action = ProcessPurchaseAction {
            cart: &cart,
            payments: &payments,
            supplier: "Distribuidora Lima",
            document: Some("F001-123"),
        };
        let events = action.execute(&mut ctx, &metadata()).unwrap();

        let stock: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StoreEvent::StockAdjusted(m) => Some(m.current_stock),
                _ => None,
            })
            .collect();
        assert_eq!(stock, vec![2]);

        let cash: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StoreEvent::CashRecorded(m) => Some(m),
                _ => None,
            })
            .collect();
        assert_eq!(cash.len(), 1);
        assert_eq!(cash[0].kind, MovementKind::Egreso);
        assert_eq!(cash[0].payment_method, PaymentMethod::Efectivo);
        assert_eq!(cash[0].amount, 12.0);
        assert_eq!(cash[0].category.as_deref(), Some(categories::PURCHASE));

        assert!(events.iter().any(|e| matches!(
            e,
            StoreEvent::ProductCostUpdated { cost, .. } if *cost == 6.0
        )));
    }

    #[test]
    fn test_purchase_requires_supplier() {
        let state = state();
        let settings = CheckoutSettings::default();
        let mut ctx = CommandContext::new(&state, &settings);

        let mut cart = Cart::new(CartContext::Purchase);
        cart.add_item(&state.products[0]).unwrap();
        let mut payments = PaymentCollector::new(cart.total());
        payments.add_payment(PaymentInput::cash(6.0)).unwrap();

        let action = ProcessPurchaseAction {
            cart: &cart,
            payments: &payments,
            supplier: "  ",
            document: None,
        };
        let err = action.execute(&mut ctx, &metadata()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RequiredField);
    }
}
