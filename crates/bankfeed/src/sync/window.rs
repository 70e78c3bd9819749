//! Date-window filtering and ordering for sync results
//!
//! Pure functions that can be tested without a provider.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::Transaction;

/// Inclusive calendar-date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    #[serde(rename = "start_date")]
    pub start: NaiveDate,
    #[serde(rename = "end_date")]
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window covering the `days` days up to and including `today`
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(days as u64))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// Inclusive on both ends
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Keep transactions dated inside the window.
///
/// Records without a parseable date never match.
pub fn filter_window(transactions: Vec<Transaction>, window: &DateWindow) -> Vec<Transaction> {
    transactions
        .into_iter()
        .filter(|t| t.date.is_some_and(|d| window.contains(d)))
        .collect()
}

/// Order newest first. The sort is stable, so equal dates keep their
/// arrival order.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}
