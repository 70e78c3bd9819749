//! Transaction model normalized from the provider feed

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unique identifier for a transaction (provider-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TransactionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single bank transaction.
///
/// The provider's schema is open-ended, so only the fields the sync
/// pipeline inspects are typed. Every other upstream field rides along in
/// `extra` and is emitted back unchanged when the record is serialized for
/// the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Provider transaction ID
    #[serde(rename = "transaction_id")]
    pub id: TransactionId,
    /// Account the transaction was posted to
    pub account_id: String,
    /// Posting date, calendar-only. `None` when the provider sent a value
    /// that does not parse as a date; such records never match a window.
    pub date: Option<NaiveDate>,
    /// Signed amount; outflows are negative by convention
    pub amount: f64,
    /// ISO currency code, or the provider's unofficial code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Merchant or counterparty description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the transaction is still pending settlement
    #[serde(default)]
    pub pending: bool,
    /// Provider fields the pipeline does not inspect
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
