//! Incremental sync engine
//!
//! Drives a [`TransactionSource`] through the provider's cursor protocol
//! and turns the accumulated pages into a windowed, newest-first report.
//!
//! The cursor loop is inherently sequential: each fetch needs the cursor
//! returned by the previous one, so pages are never fetched in parallel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Local;
use log::{debug, info};

use super::window::{DateWindow, filter_window, sort_newest_first};
use crate::error::SyncError;
use crate::models::Transaction;
use crate::provider::{SyncPoll, TransactionSource};

/// Cooperative cancellation flag for a sync run.
///
/// The engine checks it between pages and throughout every not-ready
/// wait, which is where a run can spend unbounded wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the run fails with [`SyncError::Cancelled`]
    /// at its next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tuning for the cursor loop
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Wait between polls while the provider is still materializing data
    pub not_ready_delay: Duration,
    /// Give up with [`SyncError::Timeout`] after this many consecutive
    /// not-ready polls
    pub max_not_ready_attempts: u32,
    /// Cooperative cancellation; checked at every suspension point
    pub cancel: Option<CancelToken>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            not_ready_delay: Duration::from_millis(2000),
            max_not_ready_attempts: 30,
            cancel: None,
        }
    }
}

/// Counters from one sync run
#[derive(Debug, Default, Clone)]
pub struct SyncStats {
    /// Pages consumed from the provider
    pub pages: usize,
    /// Transactions accumulated across pages, pre-filter
    pub records_fetched: usize,
    /// Not-ready polls answered with a wait
    pub not_ready_waits: usize,
    /// Duration of the run
    pub duration_ms: u64,
}

/// Result of an incremental sync run
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Windowed transactions, newest first
    pub transactions: Vec<Transaction>,
    /// Window the records were filtered to
    pub window: DateWindow,
    pub stats: SyncStats,
}

/// Result of a ranged fetch
#[derive(Debug, Clone)]
pub struct RangeReport {
    /// Transactions in the window, newest first
    pub transactions: Vec<Transaction>,
    pub window: DateWindow,
    /// Provider-side total for the window
    pub total_transactions: u32,
}

/// Sync recently added transactions.
///
/// Walks the cursor protocol from the start of history, accumulating
/// added records until the provider reports no more pages, then filters
/// to the last `days` days (inclusive, local system date) and orders
/// newest first.
pub fn sync_recent(
    source: &dyn TransactionSource,
    access_token: &str,
    days: u32,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    let window = DateWindow::last_days(Local::now().date_naive(), days);
    sync_window(source, access_token, window, options)
}

/// Same as [`sync_recent`] with an explicit window, for callers that
/// manage "today" themselves.
///
/// An empty-cursor response means the provider is still computing the
/// item's transactions: the engine waits `not_ready_delay` and repeats
/// the poll with the cursor it just used. `max_not_ready_attempts`
/// consecutive such responses fail the run with [`SyncError::Timeout`]
/// instead of blocking forever. Any other failure aborts the run; no
/// partial result is returned.
pub fn sync_window(
    source: &dyn TransactionSource,
    access_token: &str,
    window: DateWindow,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    let start = Instant::now();
    let mut stats = SyncStats::default();
    let mut accumulated: Vec<Transaction> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut more = true;
    let mut not_ready_streak: u32 = 0;

    while more {
        check_cancelled(options)?;

        match source.sync_page(access_token, cursor.as_deref())? {
            SyncPoll::NotReady => {
                not_ready_streak += 1;
                if not_ready_streak >= options.max_not_ready_attempts {
                    return Err(SyncError::Timeout {
                        attempts: not_ready_streak,
                    });
                }
                stats.not_ready_waits += 1;
                debug!(
                    "provider still processing; waiting {:?} (poll {})",
                    options.not_ready_delay, not_ready_streak
                );
                // Retry with the identical cursor once the wait elapses
                wait(options)?;
            }
            SyncPoll::Page(page) => {
                not_ready_streak = 0;
                debug!(
                    "fetched {} transactions, has_more: {}",
                    page.added.len(),
                    page.has_more
                );
                stats.pages += 1;
                stats.records_fetched += page.added.len();
                accumulated.extend(page.added);
                cursor = Some(page.next_cursor);
                more = page.has_more;
            }
        }
    }

    let mut transactions = filter_window(accumulated, &window);
    sort_newest_first(&mut transactions);
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "synced {} of {} transactions into {} to {} ({} pages)",
        transactions.len(),
        stats.records_fetched,
        window.start,
        window.end,
        stats.pages
    );

    Ok(SyncReport {
        transactions,
        window,
        stats,
    })
}

/// Fetch the last `days` days with a direct ranged query.
///
/// No cursor loop: the provider filters server-side. The item's accounts
/// are enumerated first to scope the request.
pub fn fetch_range(
    source: &dyn TransactionSource,
    access_token: &str,
    days: u32,
) -> Result<RangeReport, SyncError> {
    let window = DateWindow::last_days(Local::now().date_naive(), days);
    fetch_window(source, access_token, window)
}

/// Same as [`fetch_range`] with an explicit window
pub fn fetch_window(
    source: &dyn TransactionSource,
    access_token: &str,
    window: DateWindow,
) -> Result<RangeReport, SyncError> {
    let accounts = source.accounts(access_token)?;
    let account_ids: Vec<String> = accounts.into_iter().map(|a| a.account_id).collect();
    debug!(
        "fetching {} to {} for {} accounts",
        window.start,
        window.end,
        account_ids.len()
    );

    let ranged = source.transactions_in_range(access_token, &window, &account_ids)?;
    let mut transactions = ranged.transactions;
    sort_newest_first(&mut transactions);

    info!(
        "ranged fetch returned {} of {} transactions",
        transactions.len(),
        ranged.total_transactions
    );

    Ok(RangeReport {
        transactions,
        window,
        total_transactions: ranged.total_transactions,
    })
}

fn check_cancelled(options: &SyncOptions) -> Result<(), SyncError> {
    if options.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
        return Err(SyncError::Cancelled);
    }
    Ok(())
}

/// Sleep for the not-ready delay, honoring cancellation.
///
/// The wait is sliced so a cancel lands within ~100 ms instead of after
/// the full delay.
fn wait(options: &SyncOptions) -> Result<(), SyncError> {
    const SLICE: Duration = Duration::from_millis(100);

    let deadline = Instant::now() + options.not_ready_delay;
    loop {
        check_cancelled(options)?;
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        std::thread::sleep(SLICE.min(deadline - now));
    }
}
