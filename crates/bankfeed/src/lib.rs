//! Bankfeed - incremental bank-transaction synchronization
//!
//! This crate provides platform-independent transaction-feed functionality
//! including:
//! - Domain models (Transaction, Account)
//! - Provider REST client and credential loading
//! - Cursor-driven incremental sync engine with not-ready backoff
//! - Date-window filtering and newest-first ordering
//! - Session state for the single linked item
//!
//! The HTTP routing layer and browser UI are external collaborators; this
//! crate has zero UI dependencies and performs no persistence of synced
//! data beyond a single invocation.

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod service;
pub mod session;
pub mod sync;

pub use config::{Environment, ProviderCredentials};
pub use error::SyncError;
pub use models::{Account, Transaction, TransactionId};
pub use provider::{ProviderClient, RangedTransactions, SyncPage, SyncPoll, TransactionSource};
pub use service::{
    DEFAULT_LOOKBACK_DAYS, PRODUCTS, TransactionsReport, exchange_public_token, item_status,
    link_token, ranged_transactions, sync_recent_transactions,
};
pub use session::{ItemStatus, LinkedItem, SessionState};
pub use sync::{CancelToken, DateWindow, SyncOptions, SyncReport, SyncStats};
