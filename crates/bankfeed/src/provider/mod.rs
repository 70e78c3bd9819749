//! Provider API integration
//!
//! This module provides:
//! - REST client for the provider's transactions API
//! - The [`TransactionSource`] seam the sync engine drives
//! - Response normalization to domain models

mod client;
mod normalize;
mod source;

pub use client::ProviderClient;
pub use normalize::{normalize_page, normalize_transaction};
pub use source::{RangedTransactions, SyncPage, SyncPoll, TransactionSource};

/// Provider wire types (transactions API, version 2020-09-14)
pub mod api {
    use serde::{Deserialize, Serialize};
    use serde_json::{Map, Value};

    use crate::models::Account;

    /// One page from the incremental sync endpoint
    #[derive(Debug, Deserialize)]
    pub struct TransactionsSyncResponse {
        #[serde(default)]
        pub added: Vec<WireTransaction>,
        #[serde(default)]
        pub modified: Vec<WireTransaction>,
        #[serde(default)]
        pub removed: Vec<RemovedTransaction>,
        pub next_cursor: String,
        pub has_more: bool,
    }

    /// Tombstone for a transaction removed upstream
    #[derive(Debug, Deserialize)]
    pub struct RemovedTransaction {
        pub transaction_id: String,
    }

    /// Response from the ranged transactions endpoint
    #[derive(Debug, Deserialize)]
    pub struct TransactionsGetResponse {
        pub transactions: Vec<WireTransaction>,
        pub total_transactions: u32,
    }

    /// Response from account enumeration
    #[derive(Debug, Deserialize)]
    pub struct AccountsGetResponse {
        pub accounts: Vec<Account>,
    }

    /// Response from the public-token exchange
    #[derive(Debug, Deserialize)]
    pub struct ExchangeResponse {
        pub access_token: String,
        pub item_id: String,
    }

    /// Response from link-token creation
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LinkTokenResponse {
        pub link_token: String,
        pub expiration: Option<String>,
    }

    /// Error body the provider returns on business failures
    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub error_code: String,
        pub error_message: String,
        pub display_message: Option<String>,
    }

    /// A transaction as the provider sends it.
    ///
    /// `date` stays a raw string here so a malformed value degrades to
    /// "outside every window" during normalization instead of failing the
    /// whole page. Fields the pipeline does not inspect land in `extra`.
    #[derive(Debug, Clone, Deserialize)]
    pub struct WireTransaction {
        pub transaction_id: String,
        pub account_id: String,
        /// Posting date, YYYY-MM-DD
        pub date: String,
        pub amount: f64,
        pub iso_currency_code: Option<String>,
        pub unofficial_currency_code: Option<String>,
        pub name: Option<String>,
        #[serde(default)]
        pub pending: bool,
        #[serde(flatten)]
        pub extra: Map<String, Value>,
    }
}
