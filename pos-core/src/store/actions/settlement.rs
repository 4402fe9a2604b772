//! Payment settlement shared by every command that takes a collector

use crate::checkout::{CollectorState, PaymentCollector, bucket_payments};
use crate::money;
use crate::store::{
    CheckoutError, CheckoutResult, CommandContext, CommandMetadata, LedgerEntry, StoreEvent,
};
use shared::error::ErrorCode;
use shared::models::{MovementKind, PaymentBreakdown, PaymentBucket, PaymentDetail};

/// Payments resolved against the registry and bucketed
#[derive(Debug, Clone, Default)]
pub(crate) struct Settlement {
    pub payments: Vec<PaymentDetail>,
    pub breakdown: PaymentBreakdown,
    pub change: f64,
}

/// Who is paying, for store credit checks
#[derive(Debug, Clone, Copy)]
pub(crate) enum Payer<'a> {
    Client(&'a str),
    Anonymous,
    /// Purchases: store credit is never accepted
    Store,
}

impl Settlement {
    /// Validate `collector` against `target` and resolve its tenders
    ///
    /// Change is handed back in cash, so it may not exceed the cash bucket.
    pub fn resolve(
        ctx: &CommandContext<'_>,
        collector: &PaymentCollector,
        target: f64,
        payer: Payer<'_>,
    ) -> CheckoutResult<Self> {
        // 1. Collector must be live and aimed at this target
        if collector.state() == CollectorState::Abandoned {
            return Err(CheckoutError::Precondition(
                ErrorCode::InvalidRequest,
                "Payment collection was abandoned".to_string(),
            ));
        }
        if !money::money_eq(collector.target(), target) {
            return Err(CheckoutError::Precondition(
                ErrorCode::InvalidRequest,
                format!(
                    "Payments were collected for {:.2} but the total is {:.2}",
                    collector.target(),
                    target
                ),
            ));
        }

        // 2. Paid within tolerance (store setting, not the collector's)
        let paid = collector.paid_total();
        let tolerance = ctx.settings().payment_tolerance;
        if !money::is_payment_sufficient(paid, target, tolerance) {
            return Err(CheckoutError::Precondition(
                ErrorCode::PaymentInsufficientAmount,
                format!(
                    "Paid {:.2} of {:.2}, {:.2} remaining",
                    paid,
                    target,
                    money::saturating_sub(target, paid)
                ),
            ));
        }

        // 3. Resolve each tender
        let mut payments = Vec::with_capacity(collector.payments().len());
        for payment in collector.payments() {
            let mut detail = payment.clone();
            if detail.method.is_wallet() {
                match payer {
                    Payer::Client(client_id) => {
                        ctx.client(client_id)?;
                    }
                    Payer::Anonymous => {
                        return Err(CheckoutError::Validation(
                            ErrorCode::PaymentInvalidMethod,
                            "Saldo Favor needs a client".to_string(),
                        ));
                    }
                    Payer::Store => {
                        return Err(CheckoutError::Validation(
                            ErrorCode::PaymentInvalidMethod,
                            "Saldo Favor cannot pay a purchase".to_string(),
                        ));
                    }
                }
            }
            if detail.method.requires_reference() {
                let account_id = detail.account_id.as_deref().ok_or_else(|| {
                    CheckoutError::Validation(
                        ErrorCode::PaymentReferenceRequired,
                        format!("{} payment has no destination account", detail.method),
                    )
                })?;
                detail.bank_name = Some(ctx.bank_account(account_id)?.bank_name.clone());
            }
            payments.push(detail);
        }

        // 4. Bucket, and hand change back from the cash bucket only
        let breakdown = bucket_payments(&payments);
        let change = money::saturating_sub(paid, target);
        if money::exceeds(change, breakdown.cash) {
            return Err(CheckoutError::Validation(
                ErrorCode::PaymentInvalidAmount,
                format!(
                    "Change {:.2} exceeds the cash tendered {:.2}",
                    change, breakdown.cash
                ),
            ));
        }

        Ok(Self {
            payments,
            breakdown,
            change,
        })
    }

    /// Amount that actually stays in (or leaves) a ledger bucket
    pub fn ledger_amount(&self, bucket: PaymentBucket) -> f64 {
        match bucket {
            PaymentBucket::Cash => money::saturating_sub(self.breakdown.cash, self.change),
            other => self.breakdown.amount(other),
        }
    }

    pub fn wallet(&self) -> f64 {
        self.breakdown.wallet_amount()
    }

    /// One ledger row per non-zero cash / yape / card / bank bucket
    pub fn ledger_events(
        &self,
        ctx: &mut CommandContext<'_>,
        kind: MovementKind,
        category: &str,
        concept: &str,
        reference_id: &str,
        metadata: &CommandMetadata,
    ) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        for bucket in PaymentBucket::LEDGER {
            let amount = self.ledger_amount(bucket);
            if !money::is_positive(amount) {
                continue;
            }
            let entry = LedgerEntry {
                kind,
                method: bucket.ledger_method(),
                amount,
                concept: concept.to_string(),
                category: Some(category.to_string()),
                reference_id: Some(reference_id.to_string()),
                financial_type: None,
            };
            events.push(ctx.cash_movement(entry, metadata));
        }
        events
    }
}
