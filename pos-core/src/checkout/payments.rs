//! Payment collector
//!
//! Accumulates heterogeneous tenders against a target and keeps a running
//! reconciliation (paid, remaining, change) before anything is committed.

use crate::money::{self, DEFAULT_PAYMENT_TOLERANCE};
use crate::store::CheckoutError;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{PaymentBreakdown, PaymentBucket, PaymentDetail, PaymentMethod};

/// Tender as typed at the till
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    pub method: PaymentMethod,
    pub amount: f64,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl PaymentInput {
    pub fn cash(amount: f64) -> Self {
        Self {
            method: PaymentMethod::Efectivo,
            amount,
            reference: None,
            account_id: None,
        }
    }

    pub fn wallet(amount: f64) -> Self {
        Self {
            method: PaymentMethod::SaldoFavor,
            amount,
            reference: None,
            account_id: None,
        }
    }

    /// Transfer, card or deposit into `account_id`
    pub fn transfer(
        method: PaymentMethod,
        amount: f64,
        reference: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            method,
            amount,
            reference: Some(reference.into()),
            account_id: Some(account_id.into()),
        }
    }

    /// Check method-specific fields. Amount and wallet limits are checked
    /// by the caller.
    pub(crate) fn validate_fields(&self) -> Result<(), CheckoutError> {
        if self.method.requires_reference() {
            if is_blank(&self.account_id) {
                return Err(CheckoutError::Validation(
                    ErrorCode::PaymentReferenceRequired,
                    format!("{} payments need a destination account", self.method),
                ));
            }
            if is_blank(&self.reference) {
                return Err(CheckoutError::Validation(
                    ErrorCode::PaymentReferenceRequired,
                    format!("{} payments need an operation reference", self.method),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn into_detail(self, amount: f64) -> PaymentDetail {
        PaymentDetail {
            id: uuid::Uuid::new_v4().to_string(),
            method: self.method,
            amount,
            reference: trimmed(self.reference),
            account_id: trimmed(self.account_id),
            bank_name: None,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectorState {
    Empty,
    Accumulating,
    Satisfied,
    Abandoned,
}

/// Tenders collected against a target amount
#[derive(Debug, Clone)]
pub struct PaymentCollector {
    target: f64,
    /// Client store credit; `None` when no client is attached
    available_credit: Option<f64>,
    tolerance: f64,
    payments: Vec<PaymentDetail>,
    abandoned: bool,
}

impl PaymentCollector {
    /// Collector without a client; Saldo Favor is refused
    pub fn new(target: f64) -> Self {
        Self {
            target: money::to_f64(money::to_decimal(target).max(rust_decimal::Decimal::ZERO)),
            available_credit: None,
            tolerance: DEFAULT_PAYMENT_TOLERANCE,
            payments: Vec::new(),
            abandoned: false,
        }
    }

    /// Collector for a client with `digital_balance` of store credit
    pub fn for_client(target: f64, digital_balance: f64) -> Self {
        let mut collector = Self::new(target);
        collector.available_credit = Some(digital_balance.max(0.0));
        collector
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Accept a tender
    ///
    /// Returns the suggested next amount, `max(0, target - paid)`.
    pub fn add_payment(&mut self, input: PaymentInput) -> Result<f64, CheckoutError> {
        // 1. Abandoned collectors take nothing
        if self.abandoned {
            return Err(CheckoutError::Precondition(
                ErrorCode::InvalidRequest,
                "Payment collection was abandoned".to_string(),
            ));
        }

        // 2. Amount must be finite and positive
        let amount = money::validate_amount(input.amount, "payment amount")?;

        // 3. Transfers need account and reference
        input.validate_fields()?;

        // 4. Store credit capped by balance minus what is already allocated
        if input.method.is_wallet() {
            let Some(credit) = self.available_credit else {
                return Err(CheckoutError::Validation(
                    ErrorCode::PaymentInvalidMethod,
                    "Saldo Favor needs a client".to_string(),
                ));
            };
            let available = money::saturating_sub(credit, self.wallet_allocated());
            if money::exceeds(amount, available) {
                return Err(CheckoutError::Validation(
                    ErrorCode::WalletInsufficientBalance,
                    format!(
                        "Saldo Favor {:.2} exceeds available credit {:.2}",
                        amount, available
                    ),
                ));
            }
        }

        let detail = input.into_detail(amount);
        tracing::debug!(
            payment_id = %detail.id,
            method = %detail.method,
            amount = detail.amount,
            "Payment accepted"
        );
        self.payments.push(detail);
        Ok(self.remaining())
    }

    pub fn remove_payment(&mut self, payment_id: &str) -> Result<PaymentDetail, CheckoutError> {
        let index = self
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or_else(|| {
                CheckoutError::NotFound(
                    ErrorCode::PaymentNotFound,
                    format!("Payment {} not found", payment_id),
                )
            })?;
        Ok(self.payments.remove(index))
    }

    /// Discard every tender; the collector accepts nothing afterwards
    pub fn abandon(&mut self) {
        self.payments.clear();
        self.abandoned = true;
    }

    pub fn state(&self) -> CollectorState {
        if self.abandoned {
            CollectorState::Abandoned
        } else if self.is_satisfied() {
            CollectorState::Satisfied
        } else if self.payments.is_empty() {
            CollectorState::Empty
        } else {
            CollectorState::Accumulating
        }
    }

    pub fn is_satisfied(&self) -> bool {
        !self.abandoned
            && !self.payments.is_empty()
            && money::is_payment_sufficient(self.paid_total(), self.target, self.tolerance)
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn available_credit(&self) -> Option<f64> {
        self.available_credit
    }

    pub fn payments(&self) -> &[PaymentDetail] {
        &self.payments
    }

    pub fn paid_total(&self) -> f64 {
        money::sum(self.payments.iter().map(|p| p.amount))
    }

    pub fn remaining(&self) -> f64 {
        money::saturating_sub(self.target, self.paid_total())
    }

    pub fn change(&self) -> f64 {
        money::saturating_sub(self.paid_total(), self.target)
    }

    /// Store credit already allocated in this collector
    pub fn wallet_allocated(&self) -> f64 {
        money::sum(
            self.payments
                .iter()
                .filter(|p| p.method.is_wallet())
                .map(|p| p.amount),
        )
    }

    pub fn breakdown(&self) -> PaymentBreakdown {
        bucket_payments(&self.payments)
    }
}

/// Collapse tenders into the canonical buckets
///
/// Yape and Plin share a bucket; the wallet bucket is `None` when unused.
pub fn bucket_payments(payments: &[PaymentDetail]) -> PaymentBreakdown {
    let total_for = |bucket: PaymentBucket| {
        money::sum(
            payments
                .iter()
                .filter(|p| p.method.bucket() == bucket)
                .map(|p| p.amount),
        )
    };

    let mut breakdown = PaymentBreakdown::default();
    for bucket in PaymentBucket::LEDGER {
        breakdown.set(bucket, total_for(bucket));
    }
    breakdown.set(PaymentBucket::Wallet, total_for(PaymentBucket::Wallet));
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine() {
        let mut collector = PaymentCollector::new(25.5);
        assert_eq!(collector.state(), CollectorState::Empty);

        collector.add_payment(PaymentInput::cash(15.0)).unwrap();
        assert_eq!(collector.state(), CollectorState::Accumulating);

        let next = collector
            .add_payment(PaymentInput::transfer(PaymentMethod::Yape, 10.5, "OP1", "b1"))
            .unwrap();
        assert_eq!(next, 0.0);
        assert_eq!(collector.state(), CollectorState::Satisfied);
        assert_eq!(collector.paid_total(), 25.5);
        assert_eq!(collector.remaining(), 0.0);
        assert_eq!(collector.change(), 0.0);
    }

    #[test]
    fn test_suggests_remaining_amount() {
        let mut collector = PaymentCollector::new(40.0);
        assert_eq!(collector.add_payment(PaymentInput::cash(12.3)).unwrap(), 27.7);
    }

    #[test]
    fn test_within_tolerance_is_satisfied() {
        let mut collector = PaymentCollector::new(25.5);
        collector.add_payment(PaymentInput::cash(25.4)).unwrap();
        assert!(collector.is_satisfied());

        let mut collector = PaymentCollector::new(25.5);
        collector.add_payment(PaymentInput::cash(25.3)).unwrap();
        assert!(!collector.is_satisfied());
        assert_eq!(collector.remaining(), 0.2);
    }

    #[test]
    fn test_change_on_overpayment() {
        let mut collector = PaymentCollector::new(25.5);
        collector.add_payment(PaymentInput::cash(30.0)).unwrap();
        assert_eq!(collector.change(), 4.5);
        assert_eq!(collector.remaining(), 0.0);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let mut collector = PaymentCollector::new(10.0);
        for amount in [0.0, -1.0, f64::NAN] {
            let err = collector.add_payment(PaymentInput::cash(amount)).unwrap_err();
            assert!(matches!(err, CheckoutError::Validation(..)));
        }
        assert!(collector.payments().is_empty());
    }

    #[test]
    fn test_transfers_need_account_and_reference() {
        let mut collector = PaymentCollector::new(10.0);

        let mut input = PaymentInput::transfer(PaymentMethod::Plin, 5.0, "OP9", "b1");
        input.account_id = None;
        let err = collector.add_payment(input).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentReferenceRequired);

        let input = PaymentInput::transfer(PaymentMethod::Tarjeta, 5.0, "   ", "b1");
        let err = collector.add_payment(input).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentReferenceRequired);

        assert!(collector.payments().is_empty());
    }

    #[test]
    fn test_wallet_cap_counts_prior_wallet_entries() {
        let mut collector = PaymentCollector::for_client(60.0, 50.0);
        collector.add_payment(PaymentInput::wallet(30.0)).unwrap();

        let err = collector.add_payment(PaymentInput::wallet(20.01)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::WalletInsufficientBalance);

        collector.add_payment(PaymentInput::wallet(20.0)).unwrap();
        assert_eq!(collector.wallet_allocated(), 50.0);
    }

    #[test]
    fn test_wallet_without_client() {
        let mut collector = PaymentCollector::new(10.0);
        let err = collector.add_payment(PaymentInput::wallet(5.0)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentInvalidMethod);
    }

    #[test]
    fn test_remove_payment_frees_wallet_allocation() {
        let mut collector = PaymentCollector::for_client(30.0, 30.0);
        collector.add_payment(PaymentInput::wallet(30.0)).unwrap();
        let id = collector.payments()[0].id.clone();

        collector.remove_payment(&id).unwrap();
        assert_eq!(collector.state(), CollectorState::Empty);
        collector.add_payment(PaymentInput::wallet(30.0)).unwrap();

        let err = collector.remove_payment("missing").unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentNotFound);
    }

    #[test]
    fn test_abandon() {
        let mut collector = PaymentCollector::new(10.0);
        collector.add_payment(PaymentInput::cash(10.0)).unwrap();
        collector.abandon();

        assert_eq!(collector.state(), CollectorState::Abandoned);
        assert_eq!(collector.paid_total(), 0.0);
        assert!(collector.add_payment(PaymentInput::cash(1.0)).is_err());
    }

    #[test]
    fn test_breakdown_conservation() {
        let mut collector = PaymentCollector::for_client(100.0, 20.0);
        collector.add_payment(PaymentInput::cash(10.1)).unwrap();
        collector
            .add_payment(PaymentInput::transfer(PaymentMethod::Yape, 20.2, "Y1", "b1"))
            .unwrap();
        collector
            .add_payment(PaymentInput::transfer(PaymentMethod::Plin, 5.05, "P1", "b1"))
            .unwrap();
        collector
            .add_payment(PaymentInput::transfer(PaymentMethod::Tarjeta, 30.3, "T1", "b2"))
            .unwrap();
        collector
            .add_payment(PaymentInput::transfer(PaymentMethod::Deposito, 14.35, "D1", "b2"))
            .unwrap();
        collector.add_payment(PaymentInput::wallet(20.0)).unwrap();

        let b = collector.breakdown();
        assert_eq!(b.cash, 10.1);
        assert_eq!(b.yape, 25.25);
        assert_eq!(b.card, 30.3);
        assert_eq!(b.bank, 14.35);
        assert_eq!(b.wallet, Some(20.0));
        assert_eq!(
            money::sum([b.cash, b.yape, b.card, b.bank, b.wallet_amount()]),
            collector.paid_total()
        );
    }
}
