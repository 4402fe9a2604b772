//! Cash Movement Model

use super::PaymentMethod;
use serde::{Deserialize, Serialize};

/// Ledger categories written by the checkout core
pub mod categories {
    pub const SALE: &str = "Venta";
    pub const PURCHASE: &str = "Compra";
    pub const SERVICE: &str = "Servicio";
    pub const CREDIT_NOTE: &str = "Nota de Credito";
    pub const WALLET: &str = "Billetera";
}

/// Direction of a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    Ingreso,
    Egreso,
}

/// Expense classification for manual movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancialType {
    Fijo,
    Variable,
}

/// Append-only ledger row
///
/// `amount` is always positive; direction comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashMovement {
    pub id: i64,
    /// Unix millis
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub payment_method: PaymentMethod,
    pub concept: String,
    pub amount: f64,
    pub user: String,
    /// Ticket / order / note id the row belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_type: Option<FinancialType>,
}

impl CashMovement {
    /// Signed contribution to a balance
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            MovementKind::Ingreso => self.amount,
            MovementKind::Egreso => -self.amount,
        }
    }
}
