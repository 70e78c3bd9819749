//! Integration tests for the bankfeed crate
//!
//! These tests drive the full flow from session bootstrap through a
//! windowed sync report against a scripted provider.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use serde_json::Map;

use bankfeed::{
    Account, DEFAULT_LOOKBACK_DAYS, DateWindow, Environment, RangedTransactions, SessionState,
    SyncError, SyncOptions, SyncPage, SyncPoll, Transaction, TransactionId, TransactionSource,
    item_status, ranged_transactions, sync_recent_transactions,
};

/// Helper to create test transactions
fn make_transaction(id: &str, date: NaiveDate) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        account_id: "acc-1".into(),
        date: Some(date),
        amount: -25.0,
        currency: Some("USD".into()),
        name: Some(format!("Merchant for {}", id)),
        pending: false,
        extra: Map::new(),
    }
}

fn days_ago(n: u64) -> NaiveDate {
    Local::now()
        .date_naive()
        .checked_sub_days(Days::new(n))
        .unwrap()
}

/// Scripted provider standing in for the remote API
struct ScriptedProvider {
    pages: Mutex<VecDeque<SyncPoll>>,
    accounts: Vec<Account>,
    ranged: Option<RangedTransactions>,
    remote_calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(pages: Vec<SyncPoll>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            accounts: Vec::new(),
            ranged: None,
            remote_calls: AtomicUsize::new(0),
        }
    }

    fn remote_calls(&self) -> usize {
        self.remote_calls.load(Ordering::SeqCst)
    }
}

impl TransactionSource for ScriptedProvider {
    fn sync_page(
        &self,
        _access_token: &str,
        _cursor: Option<&str>,
    ) -> Result<SyncPoll, SyncError> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted"))
    }

    fn transactions_in_range(
        &self,
        _access_token: &str,
        _window: &DateWindow,
        _account_ids: &[String],
    ) -> Result<RangedTransactions, SyncError> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ranged.clone().expect("no ranged script"))
    }

    fn accounts(&self, _access_token: &str) -> Result<Vec<Account>, SyncError> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }
}

fn page(added: Vec<Transaction>, next_cursor: &str, has_more: bool) -> SyncPoll {
    SyncPoll::Page(SyncPage {
        added,
        next_cursor: next_cursor.into(),
        has_more,
    })
}

fn linked_session() -> SessionState {
    let session = SessionState::new();
    session.connect("access-sandbox-token", "item-1");
    session
}

fn fast_options() -> SyncOptions {
    SyncOptions {
        not_ready_delay: Duration::from_millis(5),
        ..SyncOptions::default()
    }
}

#[test]
fn test_end_to_end_sync_report() {
    // Two pages: one transaction inside the 7-day window, one outside
    let provider = ScriptedProvider::new(vec![
        page(vec![make_transaction("A", days_ago(2))], "c1", true),
        page(vec![make_transaction("B", days_ago(10))], "c2", false),
    ]);
    let session = linked_session();

    let report =
        sync_recent_transactions(&provider, &session, DEFAULT_LOOKBACK_DAYS, &fast_options())
            .unwrap();

    assert_eq!(report.count, 1);
    assert_eq!(report.transactions[0].id.as_str(), "A");
    assert_eq!(report.date_range.start, days_ago(7));
    assert_eq!(report.date_range.end, days_ago(0));
    assert!(report.total_transactions.is_none());
}

#[test]
fn test_sync_without_link_makes_no_remote_calls() {
    let provider = ScriptedProvider::new(vec![page(vec![], "c1", false)]);
    let session = SessionState::new();

    let err =
        sync_recent_transactions(&provider, &session, 7, &fast_options()).unwrap_err();

    assert!(matches!(err, SyncError::NotConnected));
    assert!(err.is_client_error());
    assert_eq!(provider.remote_calls(), 0);
}

#[test]
fn test_not_ready_pages_are_retried_then_absorbed() {
    let provider = ScriptedProvider::new(vec![
        SyncPoll::NotReady,
        SyncPoll::NotReady,
        page(vec![make_transaction("A", days_ago(1))], "c1", false),
    ]);
    let session = linked_session();

    let report =
        sync_recent_transactions(&provider, &session, 7, &fast_options()).unwrap();

    assert_eq!(report.count, 1);
    assert_eq!(provider.remote_calls(), 3);
}

#[test]
fn test_stalled_provider_times_out() {
    let provider = ScriptedProvider::new(vec![
        SyncPoll::NotReady,
        SyncPoll::NotReady,
        SyncPoll::NotReady,
    ]);
    let session = linked_session();
    let options = SyncOptions {
        not_ready_delay: Duration::from_millis(1),
        max_not_ready_attempts: 3,
        cancel: None,
    };

    let err = sync_recent_transactions(&provider, &session, 7, &options).unwrap_err();

    assert!(matches!(err, SyncError::Timeout { attempts: 3 }));
    assert_eq!(provider.remote_calls(), 3);
}

#[test]
fn test_ranged_report_carries_provider_total() {
    let mut provider = ScriptedProvider::new(vec![]);
    provider.accounts = vec![Account {
        account_id: "acc-1".into(),
        name: Some("Checking".into()),
        mask: Some("4321".into()),
        kind: Some("depository".into()),
        subtype: Some("checking".into()),
        extra: Map::new(),
    }];
    provider.ranged = Some(RangedTransactions {
        transactions: vec![
            make_transaction("older", days_ago(5)),
            make_transaction("newer", days_ago(1)),
        ],
        total_transactions: 2,
    });
    let session = linked_session();

    let report = ranged_transactions(&provider, &session, 7).unwrap();

    assert_eq!(report.count, 2);
    assert_eq!(report.total_transactions, Some(2));
    // Newest first
    let ids: Vec<&str> = report.transactions.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["newer", "older"]);
}

#[test]
fn test_ranged_without_link_makes_no_remote_calls() {
    let provider = ScriptedProvider::new(vec![]);
    let session = SessionState::new();

    let err = ranged_transactions(&provider, &session, 7).unwrap_err();

    assert!(matches!(err, SyncError::NotConnected));
    assert_eq!(provider.remote_calls(), 0);
}

#[test]
fn test_item_status_reflects_link_state() {
    let session = SessionState::new();

    let status = item_status(&session, Environment::Sandbox);
    assert!(!status.connected);
    assert!(status.item_id.is_none());
    assert_eq!(status.environment, "sandbox");
    assert_eq!(status.products, vec!["transactions"]);

    session.connect("secret-token", "item-42");
    let status = item_status(&session, Environment::Sandbox);
    assert!(status.connected);
    assert_eq!(status.item_id.as_deref(), Some("item-42"));

    let json = serde_json::to_string(&status).unwrap();
    assert!(!json.contains("secret-token"));
}

#[test]
fn test_report_serializes_to_boundary_shape() {
    let provider = ScriptedProvider::new(vec![page(
        vec![make_transaction("A", days_ago(1))],
        "c1",
        false,
    )]);
    let session = linked_session();

    let report =
        sync_recent_transactions(&provider, &session, 7, &fast_options()).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["count"], 1);
    assert!(value["date_range"]["start_date"].is_string());
    assert!(value["date_range"]["end_date"].is_string());
    assert_eq!(value["transactions"][0]["transaction_id"], "A");
}
