//! Service Order Model

use super::{PaymentBreakdown, PaymentDetail};
use serde::{Deserialize, Serialize};

/// Repair order status
///
/// `Pendiente -> Reparado -> {Entregado | Devolucion}`; the last two are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    Pendiente,
    Reparado,
    Entregado,
    Devolucion,
}

impl ServiceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Entregado | Self::Devolucion)
    }

    pub fn can_transition_to(&self, next: ServiceStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pendiente, Self::Reparado)
                | (Self::Reparado, Self::Entregado)
                | (Self::Reparado, Self::Devolucion)
        )
    }
}

/// Part consumed by a repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceProductItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: i64,
    pub client_id: String,
    pub client_name: String,
    pub device: String,
    pub problem: String,
    pub status: ServiceStatus,
    pub labor_cost: f64,
    /// Charged when the device is returned unrepaired
    #[serde(default)]
    pub diagnosis_fee: f64,
    #[serde(default)]
    pub parts: Vec<ServiceProductItem>,
    pub entry_timestamp: i64,
    /// Local date (YYYY-MM-DD) the device left the shop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_date: Option<String>,
    /// Local time (HH:MM:SS)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_breakdown: Option<PaymentBreakdown>,
    #[serde(default)]
    pub detailed_payments: Vec<PaymentDetail>,
    pub user: String,
}
