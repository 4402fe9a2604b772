use super::BucketFilter;
use crate::money;
use rust_decimal::Decimal;
use shared::models::{CashMovement, PaymentMethod};
use std::collections::BTreeMap;

/// Materialized per-method ledger totals
///
/// Updated in the same commit as every ledger append so reads never need a
/// full scan. `from_movements` over the same list always gives the same
/// figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningBalances {
    by_method: BTreeMap<PaymentMethod, Decimal>,
    movement_count: usize,
}

impl RunningBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_movements(movements: &[CashMovement]) -> Self {
        let mut balances = Self::new();
        for movement in movements {
            balances.record(movement);
        }
        balances
    }

    pub fn record(&mut self, movement: &CashMovement) {
        *self
            .by_method
            .entry(movement.payment_method)
            .or_insert(Decimal::ZERO) += money::to_decimal(movement.signed_amount());
        self.movement_count += 1;
    }

    pub fn method(&self, method: PaymentMethod) -> f64 {
        self.by_method
            .get(&method)
            .copied()
            .map(money::to_f64)
            .unwrap_or(0.0)
    }

    pub fn get(&self, filter: BucketFilter) -> f64 {
        money::to_f64(
            self.by_method
                .iter()
                .filter(|(method, _)| filter.matches(**method))
                .map(|(_, value)| *value)
                .sum(),
        )
    }

    pub fn cash(&self) -> f64 {
        self.get(BucketFilter::Efectivo)
    }

    pub fn digital(&self) -> f64 {
        self.get(BucketFilter::Digital)
    }

    pub fn total(&self) -> f64 {
        self.get(BucketFilter::Todos)
    }

    /// Number of movements folded in
    pub fn movement_count(&self) -> usize {
        self.movement_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::balance_for;
    use shared::models::MovementKind;

    fn movement(kind: MovementKind, method: PaymentMethod, amount: f64) -> CashMovement {
        CashMovement {
            id: 0,
            timestamp: 0,
            kind,
            payment_method: method,
            concept: String::new(),
            amount,
            user: String::new(),
            reference_id: None,
            category: None,
            financial_type: None,
        }
    }

    #[test]
    fn test_incremental_matches_full_scan() {
        let movements = vec![
            movement(MovementKind::Ingreso, PaymentMethod::Efectivo, 100.0),
            movement(MovementKind::Egreso, PaymentMethod::Efectivo, 30.0),
            movement(MovementKind::Ingreso, PaymentMethod::Yape, 50.0),
            movement(MovementKind::Ingreso, PaymentMethod::Plin, 0.1),
            movement(MovementKind::Egreso, PaymentMethod::Deposito, 0.2),
        ];

        let mut running = RunningBalances::new();
        for (i, m) in movements.iter().enumerate() {
            running.record(m);
            let seen = &movements[..=i];
            for filter in [BucketFilter::Todos, BucketFilter::Efectivo, BucketFilter::Digital] {
                assert_eq!(running.get(filter), balance_for(filter, seen));
            }
        }
        assert_eq!(running.cash(), 70.0);
        assert_eq!(running.digital(), 49.9);
        assert_eq!(running.total(), 119.9);
        assert_eq!(running.method(PaymentMethod::Plin), 0.1);
        assert_eq!(running.movement_count(), 5);
        assert_eq!(RunningBalances::from_movements(&movements), running);
    }
}
