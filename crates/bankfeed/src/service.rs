//! Host-facing operations
//!
//! The embedding HTTP layer calls these. Every operation that needs a
//! credential guards on the session first, so a disconnected host fails
//! with [`SyncError::NotConnected`] before any provider call is made.

use log::info;
use serde::Serialize;

use crate::config::Environment;
use crate::error::SyncError;
use crate::models::Transaction;
use crate::provider::{ProviderClient, TransactionSource, api::LinkTokenResponse};
use crate::session::{ItemStatus, SessionState};
use crate::sync::{self, DateWindow, SyncOptions};

/// Products this integration requests from the provider
pub const PRODUCTS: &[&str] = &["transactions"];

/// Default lookback window, in days
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Boundary-shaped transactions report
#[derive(Debug, Clone, Serialize)]
pub struct TransactionsReport {
    pub transactions: Vec<Transaction>,
    pub count: usize,
    pub date_range: DateWindow,
    /// Provider-side total; only the ranged mode reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_transactions: Option<u32>,
}

/// Sync recently added transactions for the linked item
pub fn sync_recent_transactions(
    source: &dyn TransactionSource,
    session: &SessionState,
    days: u32,
    options: &SyncOptions,
) -> Result<TransactionsReport, SyncError> {
    let access_token = session.access_token()?;
    info!("syncing transactions for the last {} days", days);

    let report = sync::sync_recent(source, &access_token, days, options)?;
    Ok(TransactionsReport {
        count: report.transactions.len(),
        transactions: report.transactions,
        date_range: report.window,
        total_transactions: None,
    })
}

/// Fetch the window with a direct ranged query (no cursor loop)
pub fn ranged_transactions(
    source: &dyn TransactionSource,
    session: &SessionState,
    days: u32,
) -> Result<TransactionsReport, SyncError> {
    let access_token = session.access_token()?;
    info!("fetching ranged transactions for the last {} days", days);

    let report = sync::fetch_range(source, &access_token, days)?;
    Ok(TransactionsReport {
        count: report.transactions.len(),
        transactions: report.transactions,
        date_range: report.window,
        total_transactions: Some(report.total_transactions),
    })
}

/// Create a link token for the browser-side link flow
pub fn link_token(client: &ProviderClient) -> Result<LinkTokenResponse, SyncError> {
    // One link session per request; the id only needs to be unique
    let client_user_id = format!("user-{}", chrono::Utc::now().timestamp_millis());
    client.create_link_token(&client_user_id)
}

/// Exchange a public token from the link flow and store the credential
/// pair in the session.
pub fn exchange_public_token(
    client: &ProviderClient,
    session: &SessionState,
    public_token: &str,
) -> Result<ItemStatus, SyncError> {
    let exchange = client.exchange_public_token(public_token)?;
    info!("linked item {}", exchange.item_id);

    session.connect(exchange.access_token, exchange.item_id);
    Ok(item_status(session, client.environment()))
}

/// Connection status for the boundary; never exposes the token
pub fn item_status(session: &SessionState, environment: Environment) -> ItemStatus {
    session.status(environment.as_str(), PRODUCTS)
}
