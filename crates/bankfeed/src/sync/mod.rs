//! Sync engine for pulling transactions from the provider
//!
//! The cursor loop, the not-ready backoff, and the windowing that turns
//! accumulated pages into a stable report.

mod engine;
mod window;

pub use engine::{
    CancelToken, RangeReport, SyncOptions, SyncReport, SyncStats, fetch_range, fetch_window,
    sync_recent, sync_window,
};
pub use window::{DateWindow, filter_window, sort_newest_first};
