use crate::money;
use serde::{Deserialize, Serialize};
use shared::models::{CashMovement, PaymentMethod};
use std::fmt;
use std::str::FromStr;

/// Ledger view selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BucketFilter {
    /// Every movement
    #[serde(rename = "TODOS")]
    Todos,
    /// Cash drawer only
    Efectivo,
    /// Everything that is not cash
    #[serde(rename = "DIGITAL")]
    Digital,
}

impl BucketFilter {
    pub fn matches(&self, method: PaymentMethod) -> bool {
        match self {
            Self::Todos => true,
            Self::Efectivo => method == PaymentMethod::Efectivo,
            Self::Digital => method != PaymentMethod::Efectivo,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Todos => "TODOS",
            Self::Efectivo => "Efectivo",
            Self::Digital => "DIGITAL",
        }
    }
}

impl fmt::Display for BucketFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BucketFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TODOS" | "ALL" => Ok(Self::Todos),
            "EFECTIVO" | "CASH" => Ok(Self::Efectivo),
            "DIGITAL" => Ok(Self::Digital),
            other => Err(format!("unknown ledger bucket: {}", other)),
        }
    }
}

/// Net balance (`Ingreso` minus `Egreso`) of the movements in `filter`
pub fn balance_for(filter: BucketFilter, movements: &[CashMovement]) -> f64 {
    balance_where(movements, |m| filter.matches(m.payment_method))
}

/// Net balance of the movements accepted by `predicate`
pub fn balance_where<P>(movements: &[CashMovement], predicate: P) -> f64
where
    P: Fn(&CashMovement) -> bool,
{
    money::sum(
        movements
            .iter()
            .filter(|m| predicate(m))
            .map(CashMovement::signed_amount),
    )
}
