//! Account model for the linked bank item

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A bank account enumerated from the provider.
///
/// The ranged transactions query scopes its request to account IDs, so
/// this model mostly exists to carry identifiers; descriptive fields are
/// kept for the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Provider account ID
    pub account_id: String,
    /// Account display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Last digits of the account number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// Account type (depository, credit, ...)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Account subtype (checking, savings, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Provider fields the pipeline does not inspect
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
