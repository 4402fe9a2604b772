use crate::money;
use serde::{Deserialize, Serialize};
use shared::models::{CashMovement, MovementKind, PaymentMethod};
use std::collections::BTreeMap;

/// Income, expense and net for one slice of the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

impl Totals {
    fn add(&mut self, movement: &CashMovement) {
        match movement.kind {
            MovementKind::Ingreso => self.income = money::add(self.income, movement.amount),
            MovementKind::Egreso => self.expense = money::add(self.expense, movement.amount),
        }
        self.net = money::sub(self.income, self.expense);
    }
}

/// Ledger report grouped by payment method and by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub overall: Totals,
    pub by_method: BTreeMap<PaymentMethod, Totals>,
    /// Uncategorized movements are grouped under `"Otros"`
    pub by_category: BTreeMap<String, Totals>,
}

const UNCATEGORIZED: &str = "Otros";

pub fn summarize(movements: &[CashMovement]) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    for movement in movements {
        summary.overall.add(movement);
        summary
            .by_method
            .entry(movement.payment_method)
            .or_default()
            .add(movement);
        summary
            .by_category
            .entry(
                movement
                    .category
                    .clone()
                    .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            )
            .or_default()
            .add(movement);
    }
    summary
}
