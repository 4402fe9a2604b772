//! Cash Session Model
//!
//! Till open/close cycle ("apertura / cierre de caja").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CashSessionStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashSession {
    pub id: i64,
    pub operator_id: i64,
    pub operator_name: String,
    pub status: CashSessionStatus,
    pub start_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<i64>,
    pub starting_cash: f64,
    /// Starting cash plus the cash ledger net while open (set on close)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_cash: Option<f64>,
    /// Counted at close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cash: Option<f64>,
    /// actual - expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_variance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CashSession {
    pub fn is_open(&self) -> bool {
        self.status == CashSessionStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&CashSessionStatus::Open).unwrap(),
            "\"OPEN\""
        );
        let status: CashSessionStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(status, CashSessionStatus::Closed);
    }
}
