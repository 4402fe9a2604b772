//! ProcessSale command handler
//!
//! Finalizes a sale: stock out, ledger rows per bucket, wallet debit and
//! the sale record, all in one commit.

use super::settlement::{Payer, Settlement};
use crate::checkout::{Cart, CartContext, PaymentCollector};
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandHandler, CommandMetadata, StoreEvent,
};
use shared::error::ErrorCode;
use shared::models::{MovementKind, SaleRecord, categories};

#[derive(Debug)]
pub struct ProcessSaleAction<'a> {
    pub cart: &'a Cart,
    pub payments: &'a PaymentCollector,
    pub client_id: Option<&'a str>,
}

impl CommandHandler for ProcessSaleAction<'_> {
    fn name(&self) -> &'static str {
        "process_sale"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        // 1. Validate cart
        if self.cart.context() != CartContext::Sale {
            return Err(CheckoutError::Validation(
                ErrorCode::InvalidRequest,
                format!("Cannot sell a {:?} cart", self.cart.context()),
            ));
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::Precondition(
                ErrorCode::SaleEmpty,
                "Cart is empty".to_string(),
            ));
        }
        let total = self.cart.total();

        // 2. Resolve client
        let client = match self.client_id {
            Some(id) => Some(ctx.client(id)?),
            None => None,
        };
        let payer = match client {
            Some(c) => Payer::Client(&c.id),
            None => Payer::Anonymous,
        };

        // 3. Settle payments (precondition: satisfied within tolerance)
        let settlement = Settlement::resolve(ctx, self.payments, total, payer)?;

        // 4. Stock out, one movement per line
        let ticket = ctx.next_ticket();
        let reference = format!("Venta #{}", ticket);
        let mut events = Vec::new();
        for item in self.cart.items() {
            events.push(ctx.take_stock(&item.product_id, item.quantity, &reference, metadata)?);
        }

        // 5. Store credit
        if let Some(client) = client {
            if settlement.wallet() > 0.0 {
                events.push(ctx.debit_wallet(&client.id, settlement.wallet())?);
            }
        }

        // 6. Ledger rows for money that moved
        events.extend(settlement.ledger_events(
            ctx,
            MovementKind::Ingreso,
            categories::SALE,
            &reference,
            &ticket.to_string(),
            metadata,
        ));

        // 7. Sale record
        events.push(StoreEvent::SaleRecorded(SaleRecord {
            id: ticket,
            timestamp: metadata.timestamp,
            client_id: client.map(|c| c.id.clone()),
            client_name: client.map(|c| c.name.clone()),
            items: self.cart.items().to_vec(),
            total,
            payment_breakdown: settlement.breakdown,
            detailed_payments: settlement.payments,
            change: settlement.change,
            user: metadata.operator_name().to_string(),
        }));

        Ok(events)
    }
}
