//! Payment Model
//!
//! Payment methods as the till labels them, the canonical buckets they
//! collapse into for ledger reporting, and the two payment records a
//! checkout produces (per-tender details and the bucketed breakdown).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tender method offered at the till
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentMethod {
    Efectivo,
    Yape,
    Plin,
    Tarjeta,
    Deposito,
    /// Client store credit
    #[serde(rename = "Saldo Favor")]
    SaldoFavor,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Efectivo,
        PaymentMethod::Yape,
        PaymentMethod::Plin,
        PaymentMethod::Tarjeta,
        PaymentMethod::Deposito,
        PaymentMethod::SaldoFavor,
    ];

    /// Label used on tickets and in the ledger
    pub fn label(&self) -> &'static str {
        match self {
            Self::Efectivo => "Efectivo",
            Self::Yape => "Yape",
            Self::Plin => "Plin",
            Self::Tarjeta => "Tarjeta",
            Self::Deposito => "Deposito",
            Self::SaldoFavor => "Saldo Favor",
        }
    }

    pub fn bucket(&self) -> PaymentBucket {
        match self {
            Self::Efectivo => PaymentBucket::Cash,
            Self::Yape | Self::Plin => PaymentBucket::Yape,
            Self::Tarjeta => PaymentBucket::Card,
            Self::Deposito => PaymentBucket::Bank,
            Self::SaldoFavor => PaymentBucket::Wallet,
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Efectivo)
    }

    pub fn is_wallet(&self) -> bool {
        matches!(self, Self::SaldoFavor)
    }

    /// Transfers, cards and deposits must name a destination account and an
    /// operation reference.
    pub fn requires_reference(&self) -> bool {
        !self.is_cash() && !self.is_wallet()
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical reporting bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentBucket {
    Cash,
    Yape,
    Card,
    Bank,
    Wallet,
}

impl PaymentBucket {
    /// Buckets that move real money and therefore produce ledger rows
    pub const LEDGER: [PaymentBucket; 4] = [
        PaymentBucket::Cash,
        PaymentBucket::Yape,
        PaymentBucket::Card,
        PaymentBucket::Bank,
    ];

    /// Method recorded on ledger rows for this bucket
    ///
    /// Yape and Plin share a bucket; the ledger row is written as Yape.
    pub fn ledger_method(&self) -> PaymentMethod {
        match self {
            Self::Cash => PaymentMethod::Efectivo,
            Self::Yape => PaymentMethod::Yape,
            Self::Card => PaymentMethod::Tarjeta,
            Self::Bank => PaymentMethod::Deposito,
            Self::Wallet => PaymentMethod::SaldoFavor,
        }
    }
}

/// A single tender entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// UUID assigned when the tender is accepted
    pub id: String,
    pub method: PaymentMethod,
    pub amount: f64,
    /// Operation number for transfers / vouchers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Copied from the bank account registry at checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

/// Bucketed payment summary persisted with every record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub cash: f64,
    pub yape: f64,
    pub card: f64,
    pub bank: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<f64>,
}

impl PaymentBreakdown {
    pub fn amount(&self, bucket: PaymentBucket) -> f64 {
        match bucket {
            PaymentBucket::Cash => self.cash,
            PaymentBucket::Yape => self.yape,
            PaymentBucket::Card => self.card,
            PaymentBucket::Bank => self.bank,
            PaymentBucket::Wallet => self.wallet.unwrap_or(0.0),
        }
    }

    pub fn set(&mut self, bucket: PaymentBucket, value: f64) {
        match bucket {
            PaymentBucket::Cash => self.cash = value,
            PaymentBucket::Yape => self.yape = value,
            PaymentBucket::Card => self.card = value,
            PaymentBucket::Bank => self.bank = value,
            PaymentBucket::Wallet => {
                self.wallet = if value > 0.0 { Some(value) } else { None };
            }
        }
    }

    pub fn wallet_amount(&self) -> f64 {
        self.wallet.unwrap_or(0.0)
    }
}
