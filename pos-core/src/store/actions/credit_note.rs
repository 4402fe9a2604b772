//! ProcessCreditNote command handler
//!
//! Returns goods from an earlier sale: stock back in, money back out
//! through the buckets the sale was paid with, or as store credit.

use super::require_permission;
use super::settlement::Settlement;
use crate::auth::permissions;
use crate::money;
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandHandler, CommandMetadata, StoreEvent,
};
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{
    CreditNote, MovementKind, PaymentBreakdown, PaymentBucket, ReturnedItem, SaleRecord,
    categories,
};
use std::collections::BTreeMap;

/// Buckets drained by a refund, in order
const REFUND_ORDER: [PaymentBucket; 5] = [
    PaymentBucket::Wallet,
    PaymentBucket::Cash,
    PaymentBucket::Yape,
    PaymentBucket::Card,
    PaymentBucket::Bank,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub product_id: String,
    pub quantity: u32,
}

impl ReturnRequest {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Where the refunded money goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundRoute {
    /// Back through the buckets the sale was paid with
    OriginalPayments,
    /// Entirely to the client's Saldo Favor
    StoreCredit,
}

#[derive(Debug)]
pub struct ProcessCreditNoteAction<'a> {
    pub sale_id: i64,
    pub items: &'a [ReturnRequest],
    pub route: RefundRoute,
    pub reason: &'a str,
}

impl CommandHandler for ProcessCreditNoteAction<'_> {
    fn name(&self) -> &'static str {
        "process_credit_note"
    }

    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>> {
        // 1. Permission and sale
        require_permission(metadata, permissions::REFUND)?;
        let sale = ctx.sale(self.sale_id)?;

        // 2. Returned lines, capped by what is still returnable
        let items = returned_items(ctx, sale, self.items)?;
        let items_total = money::sum(items.iter().map(|i| i.total));

        // 3. Cap at what the sale still holds, then split the refund
        let refunded = refunded_so_far(ctx, sale);
        let total = items_total.min(refundable(sale, &refunded));
        if money::exceeds(items_total, total) {
            tracing::debug!(
                sale_id = sale.id,
                items_total,
                total,
                "Refund capped at the amount collected"
            );
        }
        let refund_breakdown = match self.route {
            RefundRoute::OriginalPayments => allocate_refund(sale, &refunded, total)?,
            RefundRoute::StoreCredit => {
                if sale.client_id.is_none() {
                    return Err(CheckoutError::Validation(
                        ErrorCode::PaymentInvalidMethod,
                        format!("Sale #{} has no client to credit", sale.id),
                    ));
                }
                let mut breakdown = PaymentBreakdown::default();
                breakdown.set(PaymentBucket::Wallet, total);
                breakdown
            }
        };

        // 4. Stock back in
        let id = ctx.next_id();
        let reference = format!("Nota de Credito #{}", id);
        let mut events = Vec::new();
        for item in &items {
            events.push(ctx.put_stock(&item.product_id, item.quantity, &reference, metadata)?);
        }

        // 5. Store credit
        let wallet = refund_breakdown.wallet_amount();
        if wallet > 0.0 {
            let client_id = sale.client_id.as_deref().ok_or_else(|| {
                CheckoutError::Internal(format!("Sale #{} paid with Saldo Favor has no client", sale.id))
            })?;
            events.push(ctx.credit_wallet(client_id, wallet)?);
        }

        // 6. Money out
        let refund = Settlement {
            payments: Vec::new(),
            breakdown: refund_breakdown.clone(),
            change: 0.0,
        };
        events.extend(refund.ledger_events(
            ctx,
            MovementKind::Egreso,
            categories::CREDIT_NOTE,
            &reference,
            &sale.id.to_string(),
            metadata,
        ));

        // 7. Credit note
        events.push(StoreEvent::CreditNoteRecorded(CreditNote {
            id,
            sale_id: sale.id,
            timestamp: metadata.timestamp,
            reason: self.reason.trim().to_string(),
            items,
            total,
            refund_breakdown,
            user: metadata.operator_name().to_string(),
        }));

        Ok(events)
    }
}

/// Units of each product already returned against `sale`
fn returned_so_far(ctx: &CommandContext<'_>, sale: &SaleRecord) -> BTreeMap<String, u32> {
    let mut returned = BTreeMap::new();
    for note in ctx.state().credit_notes_for(sale.id) {
        for item in &note.items {
            *returned.entry(item.product_id.clone()).or_insert(0) += item.quantity;
        }
    }
    returned
}

fn returned_items(
    ctx: &CommandContext<'_>,
    sale: &SaleRecord,
    requests: &[ReturnRequest],
) -> CheckoutResult<Vec<ReturnedItem>> {
    if requests.is_empty() {
        return Err(CheckoutError::Validation(
            ErrorCode::RequiredField,
            "Nothing to return".to_string(),
        ));
    }

    let returned = returned_so_far(ctx, sale);
    let fully_returned = sale
        .items
        .iter()
        .all(|line| returned.get(&line.product_id).copied().unwrap_or(0) >= line.quantity);
    if fully_returned {
        return Err(CheckoutError::Precondition(
            ErrorCode::SaleAlreadyReturned,
            format!("Sale #{} has already been fully returned", sale.id),
        ));
    }

    // Merge repeated product ids before checking limits
    let mut requested: BTreeMap<&str, u32> = BTreeMap::new();
    for request in requests {
        if request.quantity == 0 {
            return Err(CheckoutError::Validation(
                ErrorCode::InvalidQuantity,
                format!("Return quantity for {} must be at least 1", request.product_id),
            ));
        }
        let entry = requested.entry(request.product_id.as_str()).or_insert(0);
        *entry = entry.saturating_add(request.quantity);
    }

    let mut items = Vec::with_capacity(requested.len());
    for (product_id, quantity) in requested {
        let sold: u32 = sale
            .items
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| line.quantity)
            .sum();
        let already = returned.get(product_id).copied().unwrap_or(0);
        let returnable = sold.saturating_sub(already);
        if quantity > returnable {
            return Err(CheckoutError::Validation(
                ErrorCode::ReturnExceedsSold,
                format!(
                    "Only {} units of {} can be returned on sale #{}, {} requested",
                    returnable, product_id, sale.id, quantity
                ),
            ));
        }

        // Sold lines share one price per product
        let Some(line) = sale.items.iter().find(|line| line.product_id == product_id) else {
            continue;
        };
        items.push(ReturnedItem {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            quantity,
            unit_price: line.unit_price,
            total: money::line_total(line.unit_price, quantity),
        });
    }
    Ok(items)
}

/// Amounts already refunded against `sale`, per bucket
fn refunded_so_far(ctx: &CommandContext<'_>, sale: &SaleRecord) -> PaymentBreakdown {
    let mut refunded = PaymentBreakdown::default();
    for note in ctx.state().credit_notes_for(sale.id) {
        for bucket in REFUND_ORDER {
            let sum = money::add(refunded.amount(bucket), note.refund_breakdown.amount(bucket));
            refunded.set(bucket, sum);
        }
    }
    refunded
}

/// What `bucket` actually kept from the sale; cash is net of change
fn received(sale: &SaleRecord, bucket: PaymentBucket) -> f64 {
    match bucket {
        PaymentBucket::Cash => money::saturating_sub(sale.payment_breakdown.cash, sale.change),
        other => sale.payment_breakdown.amount(other),
    }
}

/// Collected minus refunded; below the item total when the sale settled within tolerance
fn refundable(sale: &SaleRecord, refunded: &PaymentBreakdown) -> f64 {
    let collected = money::sum(REFUND_ORDER.iter().map(|b| received(sale, *b)));
    let paid_back = money::sum(REFUND_ORDER.iter().map(|b| refunded.amount(*b)));
    money::saturating_sub(collected, paid_back)
}

/// Spread `total` over the sale's buckets, net of change and earlier refunds
fn allocate_refund(
    sale: &SaleRecord,
    refunded: &PaymentBreakdown,
    total: f64,
) -> CheckoutResult<PaymentBreakdown> {
    let mut breakdown = PaymentBreakdown::default();
    let mut outstanding = total;
    for bucket in REFUND_ORDER {
        if !money::is_positive(outstanding) {
            break;
        }
        let available = money::saturating_sub(received(sale, bucket), refunded.amount(bucket));
        let take = outstanding.min(available);
        if money::is_positive(take) {
            breakdown.set(bucket, take);
            outstanding = money::sub(outstanding, take);
        }
    }

    if money::is_positive(outstanding) {
        return Err(CheckoutError::Validation(
            ErrorCode::PaymentRefundExceedsAmount,
            format!(
                "Refund {:.2} exceeds what sale #{} can still return by {:.2}",
                total, sale.id, outstanding
            ),
        ));
    }
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Operator;
    use crate::core::CheckoutSettings;
    use crate::store::StoreState;
    use shared::models::{CartItem, Client, Product};

    fn metadata(role: &str) -> CommandMetadata {
        CommandMetadata::new(&Operator::with_role(1, "rosa", "Rosa", role)).at(20_000)
    }

    fn state() -> StoreState {
        let mut state = StoreState::new(
            vec![Product::new("p1", "Audifonos", 20.0, 5)],
            vec![Client::new("c1", "Ana", 0.0)],
            vec![],
        );
        let breakdown = PaymentBreakdown {
            cash: 30.0,
            wallet: Some(20.0),
            ..Default::default()
        };
        state.sales.push(SaleRecord {
            id: 1,
            timestamp: 10_000,
            client_id: Some("c1".to_string()),
            client_name: Some("Ana".to_string()),
            items: vec![CartItem {
                product_id: "p1".to_string(),
                code: "p1".to_string(),
                name: "Audifonos".to_string(),
                category: String::new(),
                unit_price: 20.0,
                quantity: 2,
                total: 40.0,
            }],
            total: 40.0,
            payment_breakdown: breakdown,
            detailed_payments: Vec::new(),
            change: 10.0,
            user: "Rosa".to_string(),
        });
        state
    }

    #[test]
    fn test_refund_drains_wallet_then_cash_net_of_change() {
        let state = state();
        let settings = CheckoutSettings::default();
        let ctx = CommandContext::new(&state, &settings);
        let sale = &state.sales[0];
        let refunded = refunded_so_far(&ctx, sale);
        assert_eq!(refundable(sale, &refunded), 40.0);

        let breakdown = allocate_refund(sale, &refunded, 40.0).unwrap();
        assert_eq!(breakdown.wallet, Some(20.0));
        assert_eq!(breakdown.cash, 20.0);

        let err = allocate_refund(sale, &refunded, 40.01).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentRefundExceedsAmount);
    }

    #[test]
    fn test_refundable_shrinks_with_earlier_refunds() {
        let state = state();
        let sale = &state.sales[0];
        let refunded = PaymentBreakdown {
            cash: 5.0,
            wallet: Some(20.0),
            ..Default::default()
        };
        assert_eq!(refundable(sale, &refunded), 15.0);

        let breakdown = allocate_refund(sale, &refunded, 15.0).unwrap();
        assert_eq!(breakdown.wallet_amount(), 0.0);
        assert_eq!(breakdown.cash, 15.0);
    }

    #[test]
    fn test_credit_note_requires_refund_permission() {
        let state = state();
        let settings = CheckoutSettings::default();
        let mut ctx = CommandContext::new(&state, &settings);

        let items = [ReturnRequest::new("p1", 1)];
        let action = ProcessCreditNoteAction {
            sale_id: 1,
            items: &items,
            route: RefundRoute::OriginalPayments,
            reason: "Defectuoso",
        };
        let err = action.execute(&mut ctx, &metadata("user")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);

        let events = action.execute(&mut ctx, &metadata("manager")).unwrap();
        assert!(events.iter().any(|e| matches!(e, StoreEvent::CreditNoteRecorded(n) if n.total == 20.0)));
    }

    #[test]
    fn test_return_capped_by_quantity_sold() {
        let state = state();
        let settings = CheckoutSettings::default();
        let mut ctx = CommandContext::new(&state, &settings);

        let items = [ReturnRequest::new("p1", 2), ReturnRequest::new("p1", 1)];
        let action = ProcessCreditNoteAction {
            sale_id: 1,
            items: &items,
            route: RefundRoute::StoreCredit,
            reason: "",
        };
        let err = action.execute(&mut ctx, &metadata("admin")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ReturnExceedsSold);
    }
}
