//! Client Model

use serde::{Deserialize, Serialize};

/// Client directory entry
///
/// `digital_balance` is the client's store credit ("Saldo a favor"). It is
/// the only field the checkout core mutates and it never goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    /// DNI / RUC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub digital_balance: f64,
}

impl Client {
    pub fn new(id: impl Into<String>, name: impl Into<String>, digital_balance: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            document: None,
            phone: None,
            email: None,
            digital_balance,
        }
    }
}
