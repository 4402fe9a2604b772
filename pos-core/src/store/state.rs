//! Store state
//!
//! Every collection the checkout core reads or appends to. Records are
//! only ever appended or, for service orders, products, clients and cash
//! sessions, replaced in place by the event appliers.

use crate::checkout::StockSource;
use crate::ledger::RunningBalances;
use serde::{Deserialize, Serialize};
use shared::models::{
    BankAccount, CashMovement, CashSession, Client, CreditNote, Product, PurchaseRecord,
    SaleRecord, ServiceOrder, StockMovement,
};
use std::collections::BTreeMap;

/// First ticket number handed out by a fresh store
pub const FIRST_TICKET: i64 = 1;

/// How long a committed command id is remembered for replay rejection (7 days)
pub const COMMAND_RETENTION_MS: i64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub products: Vec<Product>,
    pub clients: Vec<Client>,
    pub bank_accounts: Vec<BankAccount>,
    #[serde(default)]
    pub sales: Vec<SaleRecord>,
    #[serde(default)]
    pub purchases: Vec<PurchaseRecord>,
    #[serde(default)]
    pub service_orders: Vec<ServiceOrder>,
    #[serde(default)]
    pub credit_notes: Vec<CreditNote>,
    #[serde(default)]
    pub cash_movements: Vec<CashMovement>,
    #[serde(default)]
    pub stock_movements: Vec<StockMovement>,
    #[serde(default)]
    pub cash_sessions: Vec<CashSession>,
    /// Committed command ids and their timestamps, within the retention window
    #[serde(default)]
    pub processed_commands: BTreeMap<String, i64>,
    #[serde(default = "first_ticket")]
    pub next_ticket: i64,
    /// Highest record id allocated so far
    #[serde(default)]
    pub last_id: i64,
    /// Rebuilt from `cash_movements` on load
    #[serde(skip)]
    pub balances: RunningBalances,
}

fn first_ticket() -> i64 {
    FIRST_TICKET
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}

impl StoreState {
    pub fn new(products: Vec<Product>, clients: Vec<Client>, bank_accounts: Vec<BankAccount>) -> Self {
        Self {
            products,
            clients,
            bank_accounts,
            sales: Vec::new(),
            purchases: Vec::new(),
            service_orders: Vec::new(),
            credit_notes: Vec::new(),
            cash_movements: Vec::new(),
            stock_movements: Vec::new(),
            cash_sessions: Vec::new(),
            processed_commands: BTreeMap::new(),
            next_ticket: FIRST_TICKET,
            last_id: 0,
            balances: RunningBalances::new(),
        }
    }

    /// Recompute materialized balances from the ledger
    pub fn rebuild_balances(&mut self) {
        self.balances = RunningBalances::from_movements(&self.cash_movements);
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn bank_account(&self, id: &str) -> Option<&BankAccount> {
        self.bank_accounts.iter().find(|a| a.id == id)
    }

    pub fn sale(&self, id: i64) -> Option<&SaleRecord> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn service_order(&self, id: i64) -> Option<&ServiceOrder> {
        self.service_orders.iter().find(|o| o.id == id)
    }

    pub fn credit_notes_for(&self, sale_id: i64) -> impl Iterator<Item = &CreditNote> {
        self.credit_notes.iter().filter(move |n| n.sale_id == sale_id)
    }

    pub fn open_cash_session(&self) -> Option<&CashSession> {
        self.cash_sessions.iter().rev().find(|s| s.is_open())
    }

    pub fn is_command_processed(&self, command_id: &str) -> bool {
        self.processed_commands.contains_key(command_id)
    }

    /// Remember a committed command and forget ids older than the retention window
    pub fn record_command(&mut self, command_id: &str, timestamp: i64) {
        let cutoff = timestamp.saturating_sub(COMMAND_RETENTION_MS);
        self.processed_commands.retain(|_, at| *at >= cutoff);
        self.processed_commands.insert(command_id.to_string(), timestamp);
    }
}

impl StockSource for StoreState {
    fn stock_of(&self, product_id: &str) -> Option<u32> {
        self.product(product_id).map(|p| p.stock)
    }
}
