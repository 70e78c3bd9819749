//! Source seam between the sync engine and the provider
//!
//! The engine drives any [`TransactionSource`]; production uses
//! [`ProviderClient`](super::ProviderClient), tests script one page at a
//! time.

use crate::error::SyncError;
use crate::models::{Account, Transaction};
use crate::sync::DateWindow;

/// One page of incremental sync output
#[derive(Debug, Clone)]
pub struct SyncPage {
    /// Newly added transactions, in arrival order
    pub added: Vec<Transaction>,
    /// Resume point for the next fetch; non-empty whenever a page is
    /// returned
    pub next_cursor: String,
    /// Whether the provider holds further pages
    pub has_more: bool,
}

/// Outcome of one sync poll.
///
/// `NotReady` is the provider's "still materializing, ask again with the
/// same cursor" signal: a successful call carrying an empty cursor. It is
/// orthogonal to `has_more = false`, which ends the run.
#[derive(Debug, Clone)]
pub enum SyncPoll {
    Page(SyncPage),
    NotReady,
}

/// Transactions in a fixed window plus the provider-side total
#[derive(Debug, Clone)]
pub struct RangedTransactions {
    pub transactions: Vec<Transaction>,
    pub total_transactions: u32,
}

/// Seam for fetching transactions from the provider
pub trait TransactionSource: Send + Sync {
    /// Fetch one sync page at `cursor` (`None` = start of history).
    ///
    /// The cursor passed here must be one returned by a previous page of
    /// the same run; cursors are opaque and only ever passed through.
    fn sync_page(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<SyncPoll, SyncError>;

    /// Fetch transactions dated inside `window` for the given accounts
    fn transactions_in_range(
        &self,
        access_token: &str,
        window: &DateWindow,
        account_ids: &[String],
    ) -> Result<RangedTransactions, SyncError>;

    /// Enumerate accounts for the linked item
    fn accounts(&self, access_token: &str) -> Result<Vec<Account>, SyncError>;
}
