//! Provider API HTTP client
//!
//! Speaks the provider's REST protocol over synchronous HTTP (ureq) to be
//! executor-agnostic. The client performs no retries of its own: the
//! engine owns the retry policy, and only for the not-ready signal.

use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::json;
use ureq::Agent;

use super::api::{
    AccountsGetResponse, ErrorBody, ExchangeResponse, LinkTokenResponse, TransactionsGetResponse,
    TransactionsSyncResponse,
};
use super::normalize::{normalize_page, normalize_transaction};
use super::source::{RangedTransactions, SyncPoll, TransactionSource};
use crate::config::{Environment, ProviderCredentials};
use crate::error::SyncError;
use crate::models::Account;
use crate::sync::DateWindow;

/// Client for the provider's transactions API
pub struct ProviderClient {
    agent: Agent,
    credentials: ProviderCredentials,
}

impl ProviderClient {
    /// Wire protocol version sent with every request
    const API_VERSION: &'static str = "2020-09-14";

    /// Overall per-request budget
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new provider client
    pub fn new(credentials: ProviderCredentials) -> Self {
        // Non-2xx responses must stay readable: the provider reports
        // business errors as a JSON body on a 4xx status.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Self::REQUEST_TIMEOUT))
            .build()
            .into();

        Self { agent, credentials }
    }

    /// Environment this client talks to
    pub fn environment(&self) -> Environment {
        self.credentials.environment
    }

    /// Create a link token for the browser-side link flow
    ///
    /// # Arguments
    /// * `client_user_id` - Identifier for the user starting the flow
    pub fn create_link_token(&self, client_user_id: &str) -> Result<LinkTokenResponse, SyncError> {
        let body = json!({
            "user": { "client_user_id": client_user_id },
            "client_name": "bankfeed",
            "products": ["transactions"],
            "country_codes": ["US", "IT"],
            "language": "en",
        });

        self.post("/link/token/create", &body)
    }

    /// Exchange a public token from the link flow for an access token
    pub fn exchange_public_token(&self, public_token: &str) -> Result<ExchangeResponse, SyncError> {
        let body = json!({ "public_token": public_token });
        self.post("/item/public_token/exchange", &body)
    }

    /// POST a JSON body to an API path and decode the response.
    ///
    /// Credentials travel in headers, matching the provider's header-auth
    /// scheme.
    fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, SyncError> {
        let url = format!("{}{}", self.credentials.environment.base_url(), path);
        debug!("POST {}", url);

        let mut response = self
            .agent
            .post(&url)
            .header("PLAID-CLIENT-ID", &self.credentials.client_id)
            .header("PLAID-SECRET", &self.credentials.secret)
            .header("Plaid-Version", Self::API_VERSION)
            .send_json(body)
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .body_mut()
                .read_json()
                .map_err(|e| SyncError::Decode(e.to_string()))
        } else {
            match response.body_mut().read_json::<ErrorBody>() {
                Ok(err) => Err(SyncError::Remote {
                    code: err.error_code,
                    message: err.error_message,
                    display_message: err.display_message,
                }),
                Err(_) => Err(SyncError::Remote {
                    code: format!("HTTP_{}", status.as_u16()),
                    message: format!("provider returned status {}", status),
                    display_message: None,
                }),
            }
        }
    }
}

impl TransactionSource for ProviderClient {
    fn sync_page(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<SyncPoll, SyncError> {
        let body = json!({
            "access_token": access_token,
            "cursor": cursor,
        });

        let response: TransactionsSyncResponse = self.post("/transactions/sync", &body)?;

        // An empty cursor on a successful call means the provider is still
        // materializing this item's transactions.
        if response.next_cursor.is_empty() {
            return Ok(SyncPoll::NotReady);
        }

        debug!(
            "sync page: {} added, has_more: {}",
            response.added.len(),
            response.has_more
        );
        Ok(SyncPoll::Page(normalize_page(response)))
    }

    fn transactions_in_range(
        &self,
        access_token: &str,
        window: &DateWindow,
        account_ids: &[String],
    ) -> Result<RangedTransactions, SyncError> {
        let body = json!({
            "access_token": access_token,
            "start_date": window.start.to_string(),
            "end_date": window.end.to_string(),
            "options": { "account_ids": account_ids },
        });

        let response: TransactionsGetResponse = self.post("/transactions/get", &body)?;

        Ok(RangedTransactions {
            transactions: response
                .transactions
                .into_iter()
                .map(normalize_transaction)
                .collect(),
            total_transactions: response.total_transactions,
        })
    }

    fn accounts(&self, access_token: &str) -> Result<Vec<Account>, SyncError> {
        let body = json!({ "access_token": access_token });
        let response: AccountsGetResponse = self.post("/accounts/get", &body)?;
        Ok(response.accounts)
    }
}
