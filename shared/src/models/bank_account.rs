//! Bank Account Model

use serde::{Deserialize, Serialize};

/// Destination account for non-cash payments ("Cuenta destino")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    pub bank_name: String,
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
}
