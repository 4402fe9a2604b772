//! Stock Movement Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockMovementKind {
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[serde(rename = "SALIDA")]
    Salida,
}

/// Inventory audit row, written together with the stock change it records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub kind: StockMovementKind,
    pub quantity: u32,
    /// Stock after the change
    pub current_stock: u32,
    /// e.g. "Venta #12"
    pub reference: String,
    pub user: String,
    pub timestamp: i64,
}
