//! Command context
//!
//! Read-only view of the store for the duration of one command. Stock,
//! wallet balances and id allocation are tracked in overlays, so a command
//! that touches the same product or client twice sees its own earlier
//! effects while the state itself stays untouched until commit.

use super::{CheckoutError, CheckoutResult, CommandMetadata, StoreEvent, StoreState};
use crate::core::CheckoutSettings;
use crate::money;
use shared::error::ErrorCode;
use shared::models::{
    BankAccount, CashMovement, Client, FinancialType, MovementKind, PaymentMethod, Product,
    SaleRecord, ServiceOrder, StockMovement, StockMovementKind,
};
use std::collections::HashMap;

/// Ledger row to be written by a command
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub kind: MovementKind,
    pub method: PaymentMethod,
    pub amount: f64,
    pub concept: String,
    pub category: Option<String>,
    pub reference_id: Option<String>,
    pub financial_type: Option<FinancialType>,
}

pub struct CommandContext<'a> {
    state: &'a StoreState,
    settings: &'a CheckoutSettings,
    stock: HashMap<String, u32>,
    wallets: HashMap<String, f64>,
    last_id: i64,
    /// Unix millis ids are anchored at
    clock: i64,
}

impl<'a> CommandContext<'a> {
    pub fn new(state: &'a StoreState, settings: &'a CheckoutSettings) -> Self {
        Self {
            state,
            settings,
            stock: HashMap::new(),
            wallets: HashMap::new(),
            last_id: state.last_id,
            clock: shared::util::now_millis(),
        }
    }

    /// Anchor id allocation at the command's own timestamp
    pub fn at(mut self, timestamp: i64) -> Self {
        self.clock = timestamp;
        self
    }

    pub fn state(&self) -> &'a StoreState {
        self.state
    }

    pub fn settings(&self) -> &'a CheckoutSettings {
        self.settings
    }

    /// Allocate a record id: a snowflake, strictly above every earlier id
    pub fn next_id(&mut self) -> i64 {
        let id = shared::util::snowflake_id_at(self.clock).max(self.last_id + 1);
        self.last_id = id;
        id
    }

    pub fn last_id(&self) -> i64 {
        self.last_id
    }

    pub fn next_ticket(&self) -> i64 {
        self.state.next_ticket
    }

    // ========== Lookups ==========

    pub fn product(&self, product_id: &str) -> CheckoutResult<&'a Product> {
        self.state.product(product_id).ok_or_else(|| {
            CheckoutError::NotFound(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", product_id),
            )
        })
    }

    pub fn client(&self, client_id: &str) -> CheckoutResult<&'a Client> {
        self.state.client(client_id).ok_or_else(|| {
            CheckoutError::NotFound(
                ErrorCode::ClientNotFound,
                format!("Client {} not found", client_id),
            )
        })
    }

    pub fn bank_account(&self, account_id: &str) -> CheckoutResult<&'a BankAccount> {
        self.state.bank_account(account_id).ok_or_else(|| {
            CheckoutError::NotFound(
                ErrorCode::BankAccountNotFound,
                format!("Bank account {} not found", account_id),
            )
        })
    }

    pub fn sale(&self, sale_id: i64) -> CheckoutResult<&'a SaleRecord> {
        self.state.sale(sale_id).ok_or_else(|| {
            CheckoutError::NotFound(ErrorCode::SaleNotFound, format!("Sale #{} not found", sale_id))
        })
    }

    pub fn service_order(&self, order_id: i64) -> CheckoutResult<&'a ServiceOrder> {
        self.state.service_order(order_id).ok_or_else(|| {
            CheckoutError::NotFound(
                ErrorCode::ServiceOrderNotFound,
                format!("Service order #{} not found", order_id),
            )
        })
    }

    // ========== Stock ==========

    pub fn current_stock(&self, product_id: &str) -> CheckoutResult<u32> {
        match self.stock.get(product_id) {
            Some(stock) => Ok(*stock),
            None => Ok(self.product(product_id)?.stock),
        }
    }

    /// Remove `quantity` units, failing if stock would go negative
    pub fn take_stock(
        &mut self,
        product_id: &str,
        quantity: u32,
        reference: &str,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<StoreEvent> {
        let product = self.product(product_id)?;
        let available = self.current_stock(product_id)?;
        let remaining = available.checked_sub(quantity).ok_or_else(|| {
            CheckoutError::Validation(
                ErrorCode::ProductOutOfStock,
                format!(
                    "Only {} units of {} in stock, {} requested",
                    available, product.name, quantity
                ),
            )
        })?;
        Ok(self.stock_event(product, StockMovementKind::Salida, quantity, remaining, reference, metadata))
    }

    /// Add `quantity` units
    pub fn put_stock(
        &mut self,
        product_id: &str,
        quantity: u32,
        reference: &str,
        metadata: &CommandMetadata,
    ) -> CheckoutResult<StoreEvent> {
        let product = self.product(product_id)?;
        let available = self.current_stock(product_id)?;
        let total = available.checked_add(quantity).ok_or_else(|| {
            CheckoutError::Validation(
                ErrorCode::ValueOutOfRange,
                format!("Stock of {} would overflow", product.name),
            )
        })?;
        Ok(self.stock_event(product, StockMovementKind::Entrada, quantity, total, reference, metadata))
    }

    fn stock_event(
        &mut self,
        product: &Product,
        kind: StockMovementKind,
        quantity: u32,
        current_stock: u32,
        reference: &str,
        metadata: &CommandMetadata,
    ) -> StoreEvent {
        self.stock.insert(product.id.clone(), current_stock);
        StoreEvent::StockAdjusted(StockMovement {
            id: self.next_id(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            kind,
            quantity,
            current_stock,
            reference: reference.to_string(),
            user: metadata.operator_name().to_string(),
            timestamp: metadata.timestamp,
        })
    }

    // ========== Wallet ==========

    /// Live balance, including earlier adjustments in this command
    pub fn wallet_balance(&self, client_id: &str) -> CheckoutResult<f64> {
        match self.wallets.get(client_id) {
            Some(balance) => Ok(*balance),
            None => Ok(self.client(client_id)?.digital_balance),
        }
    }

    /// Spend store credit; the balance never goes negative
    pub fn debit_wallet(&mut self, client_id: &str, amount: f64) -> CheckoutResult<StoreEvent> {
        let balance = self.wallet_balance(client_id)?;
        if money::exceeds(amount, balance) {
            return Err(CheckoutError::Validation(
                ErrorCode::WalletInsufficientBalance,
                format!(
                    "Saldo Favor {:.2} exceeds the client's balance {:.2}",
                    amount, balance
                ),
            ));
        }
        let balance_after = money::saturating_sub(balance, amount);
        Ok(self.wallet_event(client_id, -amount, balance_after))
    }

    pub fn credit_wallet(&mut self, client_id: &str, amount: f64) -> CheckoutResult<StoreEvent> {
        let balance = self.wallet_balance(client_id)?;
        let balance_after = money::add(balance, amount);
        Ok(self.wallet_event(client_id, amount, balance_after))
    }

    fn wallet_event(&mut self, client_id: &str, delta: f64, balance_after: f64) -> StoreEvent {
        self.wallets.insert(client_id.to_string(), balance_after);
        StoreEvent::WalletAdjusted {
            client_id: client_id.to_string(),
            delta,
            balance_after,
        }
    }

    // ========== Ledger ==========

    pub fn cash_movement(&mut self, entry: LedgerEntry, metadata: &CommandMetadata) -> StoreEvent {
        StoreEvent::CashRecorded(CashMovement {
            id: self.next_id(),
            timestamp: metadata.timestamp,
            kind: entry.kind,
            payment_method: entry.method,
            concept: entry.concept,
            amount: entry.amount,
            user: metadata.operator_name().to_string(),
            reference_id: entry.reference_id,
            category: entry.category,
            financial_type: entry.financial_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Operator;

    fn state() -> StoreState {
        StoreState::new(
            vec![Product::new("p1", "Mouse", 25.0, 3)],
            vec![Client::new("c1", "Ana", 40.0)],
            vec![],
        )
    }

    fn metadata() -> CommandMetadata {
        CommandMetadata::new(&Operator::with_role(1, "rosa", "Rosa", "user")).at(1_000)
    }

    #[test]
    fn test_stock_overlay_accumulates() {
        let state = state();
        let settings = CheckoutSettings::default();
        let mut ctx = CommandContext::new(&state, &settings);

        ctx.take_stock("p1", 2, "Venta #1", &metadata()).unwrap();
        assert_eq!(ctx.current_stock("p1").unwrap(), 1);
        let err = ctx.take_stock("p1", 2, "Venta #1", &metadata()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProductOutOfStock);

        ctx.put_stock("p1", 5, "Compra #9", &metadata()).unwrap();
        assert_eq!(ctx.current_stock("p1").unwrap(), 6);
        assert_eq!(state.products[0].stock, 3);
    }

    #[test]
    fn test_wallet_overlay_never_goes_negative() {
        let state = state();
        let settings = CheckoutSettings::default();
        let mut ctx = CommandContext::new(&state, &settings);

        ctx.debit_wallet("c1", 30.0).unwrap();
        assert_eq!(ctx.wallet_balance("c1").unwrap(), 10.0);
        let err = ctx.debit_wallet("c1", 10.01).unwrap_err();
        assert_eq!(err.code(), ErrorCode::WalletInsufficientBalance);
        ctx.credit_wallet("c1", 5.0).unwrap();
        assert_eq!(ctx.wallet_balance("c1").unwrap(), 15.0);
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut state = state();
        state.last_id = i64::MAX / 2;
        let settings = CheckoutSettings::default();
        let mut ctx = CommandContext::new(&state, &settings);

        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_eq!(a, i64::MAX / 2 + 1);
        assert_eq!(b, a + 1);
        assert_eq!(ctx.last_id(), b);
    }

    #[test]
    fn test_ids_follow_the_command_clock() {
        let state = state();
        let settings = CheckoutSettings::default();
        // 2024-01-01T00:00:00Z plus one minute
        let at = 1_704_067_260_000;

        let id = CommandContext::new(&state, &settings).at(at).next_id();
        assert_eq!(id >> 12, 60_000);

        let later = CommandContext::new(&state, &settings)
            .at(at + 1_000)
            .next_id();
        assert!(later > id);
    }

    #[test]
    fn test_unknown_lookups() {
        let state = state();
        let settings = CheckoutSettings::default();
        let ctx = CommandContext::new(&state, &settings);
        assert_eq!(ctx.product("x").unwrap_err().code(), ErrorCode::ProductNotFound);
        assert_eq!(ctx.client("x").unwrap_err().code(), ErrorCode::ClientNotFound);
        assert_eq!(
            ctx.bank_account("x").unwrap_err().code(),
            ErrorCode::BankAccountNotFound
        );
    }
}
