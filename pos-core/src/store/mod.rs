//! Store orchestrator
//!
//! [`Store`] owns every collection the checkout core touches and is the only
//! way to change them. Each business operation runs as a command:
//!
//! ```text
//! Command → CommandAction::execute(ctx) → Vec<StoreEvent> → EventApplier → StoreState
//!                    ↓ (error)
//!              nothing applied
//! ```
//!
//! 1. The command id is checked against the processed set
//! 2. The action validates against a read-only [`CommandContext`] and
//!    describes its effect as events
//! 3. Events are applied in order; appliers never fail
//! 4. The command id is recorded and the commit is audit-logged

pub mod actions;
pub mod appliers;
mod context;
mod error;
mod event;
pub mod persistence;
mod state;
mod traits;

#[cfg(test)]
mod tests;

pub use actions::{
    CommandAction, RefundRoute, ReturnRequest, ServiceIntake, ServiceOutcome, WalletDirection,
};
pub use context::{CommandContext, LedgerEntry};
pub use error::{CheckoutError, CheckoutResult};
pub use event::StoreEvent;
pub use persistence::{PersistenceError, PersistenceResult, load_snapshot, save_snapshot};
pub use state::{COMMAND_RETENTION_MS, FIRST_TICKET, StoreState};
pub use appliers::EventApplier;
pub use traits::{CommandHandler, CommandMetadata};

use crate::checkout::{Cart, PaymentCollector, PaymentInput, StockSource, Ticket};
use crate::core::CheckoutSettings;
use crate::ledger::{BucketFilter, LedgerSummary, RunningBalances, summarize};
use actions::*;
use shared::error::ErrorCode;
use shared::models::{
    BankAccount, CashMovement, CashSession, Client, CreditNote, FinancialType, MovementKind,
    Product, PurchaseRecord, SaleRecord, ServiceOrder, StockMovement,
};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Store {
    state: StoreState,
    settings: CheckoutSettings,
}

impl Store {
    pub fn new(
        products: Vec<Product>,
        clients: Vec<Client>,
        bank_accounts: Vec<BankAccount>,
        settings: CheckoutSettings,
    ) -> Self {
        Self::from_state(StoreState::new(products, clients, bank_accounts), settings)
    }

    /// Wrap an existing state, rebuilding its running balances
    pub fn from_state(mut state: StoreState, settings: CheckoutSettings) -> Self {
        state.rebuild_balances();
        Self { state, settings }
    }

    /// Load a snapshot written by [`Store::save`]
    pub fn open(path: &Path, settings: CheckoutSettings) -> PersistenceResult<Self> {
        let state = load_snapshot(path)?;
        tracing::info!(
            path = %path.display(),
            sales = state.sales.len(),
            next_ticket = state.next_ticket,
            "Store opened"
        );
        Ok(Self { state, settings })
    }

    pub fn save(&self, path: &Path) -> PersistenceResult<()> {
        save_snapshot(path, &self.state)
    }

    // ========== Queries ==========

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    pub fn products(&self) -> &[Product] {
        &self.state.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.state.product(id)
    }

    pub fn clients(&self) -> &[Client] {
        &self.state.clients
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.state.client(id)
    }

    pub fn bank_accounts(&self) -> &[BankAccount] {
        &self.state.bank_accounts
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.state.sales
    }

    pub fn sale(&self, id: i64) -> Option<&SaleRecord> {
        self.state.sale(id)
    }

    pub fn purchases(&self) -> &[PurchaseRecord] {
        &self.state.purchases
    }

    pub fn service_orders(&self) -> &[ServiceOrder] {
        &self.state.service_orders
    }

    pub fn service_order(&self, id: i64) -> Option<&ServiceOrder> {
        self.state.service_order(id)
    }

    pub fn credit_notes(&self) -> &[CreditNote] {
        &self.state.credit_notes
    }

    pub fn cash_movements(&self) -> &[CashMovement] {
        &self.state.cash_movements
    }

    pub fn stock_movements(&self) -> &[StockMovement] {
        &self.state.stock_movements
    }

    pub fn cash_sessions(&self) -> &[CashSession] {
        &self.state.cash_sessions
    }

    /// The drawer session currently open, if any
    pub fn current_cash_session(&self) -> Option<&CashSession> {
        self.state.open_cash_session()
    }

    pub fn balances(&self) -> &RunningBalances {
        &self.state.balances
    }

    /// Materialized balance; equals `ledger::balance_for` over all movements
    pub fn balance(&self, filter: BucketFilter) -> f64 {
        self.state.balances.get(filter)
    }

    pub fn ledger_summary(&self) -> LedgerSummary {
        summarize(&self.state.cash_movements)
    }

    /// Collector for `target` using the store's tolerance and, when a client
    /// is given, their current Saldo Favor as the wallet cap
    pub fn payment_collector(
        &self,
        target: f64,
        client_id: Option<&str>,
    ) -> CheckoutResult<PaymentCollector> {
        let collector = match client_id {
            Some(id) => {
                let client = self.state.client(id).ok_or_else(|| {
                    CheckoutError::NotFound(
                        ErrorCode::ClientNotFound,
                        format!("Client {} not found", id),
                    )
                })?;
                PaymentCollector::for_client(target, client.digital_balance)
            }
            None => PaymentCollector::new(target),
        };
        Ok(collector.with_tolerance(self.settings.payment_tolerance))
    }

    // ========== Commands ==========

    /// Finalize a sale; the cart is cleared only on success
    pub fn process_sale(
        &mut self,
        cart: &mut Cart,
        payments: &PaymentCollector,
        client_id: Option<&str>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Ticket> {
        let action = CommandAction::ProcessSale(ProcessSaleAction {
            cart,
            payments,
            client_id,
        });
        let events = self.execute(&action, metadata)?;
        let sale = find_record(&events, |e| match e {
            StoreEvent::SaleRecorded(sale) => Some(sale),
            _ => None,
        })?;
        let ticket = Ticket::from_sale(sale, self.settings.offset());
        cart.clear();
        Ok(ticket)
    }

    pub fn process_purchase(
        &mut self,
        cart: &mut Cart,
        payments: &PaymentCollector,
        supplier: &str,
        document: Option<&str>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<PurchaseRecord> {
        let action = CommandAction::ProcessPurchase(ProcessPurchaseAction {
            cart,
            payments,
            supplier,
            document,
        });
        let events = self.execute(&action, metadata)?;
        let purchase = find_record(&events, |e| match e {
            StoreEvent::PurchaseRecorded(purchase) => Some(purchase),
            _ => None,
        })?
        .clone();
        cart.clear();
        Ok(purchase)
    }

    pub fn open_service_order(
        &mut self,
        intake: &ServiceIntake,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<ServiceOrder> {
        let action = CommandAction::OpenServiceOrder(OpenServiceOrderAction { intake });
        let events = self.execute(&action, metadata)?;
        saved_order(&events)
    }

    pub fn set_service_parts(
        &mut self,
        order_id: i64,
        parts: &Cart,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<ServiceOrder> {
        let events = self.execute(
            &CommandAction::SetServiceParts(SetServicePartsAction { order_id, parts }),
            metadata,
        )?;
        saved_order(&events)
    }

    pub fn mark_repaired(
        &mut self,
        order_id: i64,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<ServiceOrder> {
        let action = CommandAction::MarkRepaired(MarkRepairedAction { order_id });
        let events = self.execute(&action, metadata)?;
        saved_order(&events)
    }

    /// Deliver or return a repaired order; `payments` may be `None` only
    /// when nothing is due
    pub fn finalize_service(
        &mut self,
        order_id: i64,
        outcome: ServiceOutcome,
        payments: Option<&PaymentCollector>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<ServiceOrder> {
        let action = CommandAction::FinalizeService(FinalizeServiceAction {
            order_id,
            outcome,
            payments,
        });
        let events = self.execute(&action, metadata)?;
        saved_order(&events)
    }

    pub fn process_credit_note(
        &mut self,
        sale_id: i64,
        items: &[ReturnRequest],
        route: RefundRoute,
        reason: &str,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<CreditNote> {
        let action = CommandAction::ProcessCreditNote(ProcessCreditNoteAction {
            sale_id,
            items,
            route,
            reason,
        });
        let events = self.execute(&action, metadata)?;
        find_record(&events, |e| match e {
            StoreEvent::CreditNoteRecorded(note) => Some(note),
            _ => None,
        })
        .cloned()
    }

    /// Returns the client's new Saldo Favor
    pub fn deposit_to_wallet(
        &mut self,
        client_id: &str,
        payment: &PaymentInput,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<f64> {
        self.wallet_transfer(client_id, WalletDirection::Deposit, payment, metadata)
    }

    /// Returns the client's new Saldo Favor
    pub fn withdraw_from_wallet(
        &mut self,
        client_id: &str,
        payment: &PaymentInput,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<f64> {
        self.wallet_transfer(client_id, WalletDirection::Withdraw, payment, metadata)
    }

    fn wallet_transfer(
        &mut self,
        client_id: &str,
        direction: WalletDirection,
        payment: &PaymentInput,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<f64> {
        let action = CommandAction::WalletTransfer(WalletTransferAction {
            client_id,
            direction,
            payment,
        });
        let events = self.execute(&action, metadata)?;
        find_record(&events, |e| match e {
            StoreEvent::WalletAdjusted { balance_after, .. } => Some(balance_after),
            _ => None,
        })
        .copied()
    }

    pub fn record_cash_movement(
        &mut self,
        kind: MovementKind,
        payment: &PaymentInput,
        concept: &str,
        category: Option<&str>,
        financial_type: Option<FinancialType>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<CashMovement> {
        let action = CommandAction::RecordCashMovement(RecordCashMovementAction {
            kind,
            payment,
            concept,
            category,
            financial_type,
        });
        let events = self.execute(&action, metadata)?;
        find_record(&events, |e| match e {
            StoreEvent::CashRecorded(movement) => Some(movement),
            _ => None,
        })
        .cloned()
    }

    pub fn open_cash_session(
        &mut self,
        starting_cash: f64,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<CashSession> {
        let events = self.execute(
            &CommandAction::OpenCashSession(OpenCashSessionAction { starting_cash }),
            metadata,
        )?;
        saved_session(&events)
    }

    pub fn close_cash_session(
        &mut self,
        actual_cash: f64,
        note: Option<&str>,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<CashSession> {
        let events = self.execute(
            &CommandAction::CloseCashSession(CloseCashSessionAction { actual_cash, note }),
            metadata,
        )?;
        saved_session(&events)
    }

    /// Run one command and commit its events
    ///
    /// Nothing is applied unless the whole command validates.
    pub fn execute<A>(
        &mut self,
        action: &A,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<Vec<StoreEvent>>
    where
        A: CommandHandler + ?Sized,
    {
        let command = action.name();
        tracing::debug!(command_id = %metadata.command_id, command, "Processing command");

        // 1. Idempotency check
        if self.state.is_command_processed(&metadata.command_id) {
            tracing::warn!(command_id = %metadata.command_id, command, "Duplicate command");
            return Err(CheckoutError::Precondition(
                ErrorCode::CommandAlreadyProcessed,
                format!("Command {} has already been processed", metadata.command_id),
            ));
        }

        // 2. Validate and describe the effect
        let (events, last_id) = {
            let mut ctx = CommandContext::new(&self.state, &self.settings).at(metadata.timestamp);
            match action.execute(&mut ctx, metadata) {
                Ok(events) => (events, ctx.last_id()),
                Err(err) => {
                    tracing::warn!(
                        command_id = %metadata.command_id,
                        command,
                        code = %err.code(),
                        error = %err,
                        "Command rejected"
                    );
                    return Err(err);
                }
            }
        };

        // 3. Apply
        appliers::apply_all(&mut self.state, &events);

        // 4. Record the command
        self.state.last_id = self.state.last_id.max(last_id);
        self.state.record_command(&metadata.command_id, metadata.timestamp);

        crate::audit_log!(
            metadata.operator.username.as_str(),
            command,
            metadata.command_id.as_str()
        );
        tracing::info!(
            command_id = %metadata.command_id,
            command,
            event_count = events.len(),
            "Command processed successfully"
        );
        Ok(events)
    }
}

impl StockSource for Store {
    fn stock_of(&self, product_id: &str) -> Option<u32> {
        self.state.stock_of(product_id)
    }
}

fn find_record<'e, T>(
    events: &'e [StoreEvent],
    pick: impl Fn(&'e StoreEvent) -> Option<&'e T>,
) -> CheckoutResult<&'e T> {
    events.iter().rev().find_map(pick).ok_or_else(|| {
        CheckoutError::Internal("Command committed without its record event".to_string())
    })
}

fn saved_order(events: &[StoreEvent]) -> CheckoutResult<ServiceOrder> {
    find_record(events, |e| match e {
        StoreEvent::ServiceOrderSaved(order) => Some(order),
        _ => None,
    })
    .cloned()
}

fn saved_session(events: &[StoreEvent]) -> CheckoutResult<CashSession> {
    find_record(events, |e| match e {
        StoreEvent::CashSessionSaved(session) => Some(session),
        _ => None,
    })
    .cloned()
}
