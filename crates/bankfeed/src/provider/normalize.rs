//! Provider response normalization
//!
//! Converts provider wire records to domain models.

use chrono::NaiveDate;
use log::warn;

use super::api::{TransactionsSyncResponse, WireTransaction};
use super::source::SyncPage;
use crate::models::{Transaction, TransactionId};

/// Normalize one sync response into a page of domain transactions.
///
/// Only `added` feeds the accumulation: the incremental endpoint also
/// reports `modified` and `removed`, but a single-shot report has no
/// stored state to apply those against.
pub fn normalize_page(response: TransactionsSyncResponse) -> SyncPage {
    SyncPage {
        added: response
            .added
            .into_iter()
            .map(normalize_transaction)
            .collect(),
        next_cursor: response.next_cursor,
        has_more: response.has_more,
    }
}

/// Normalize a wire transaction to a domain [`Transaction`]
pub fn normalize_transaction(wire: WireTransaction) -> Transaction {
    let date = parse_date(&wire.date);
    if date.is_none() {
        warn!(
            "transaction {} has unparseable date {:?}",
            wire.transaction_id, wire.date
        );
    }

    // Prefer the ISO code; unofficial codes cover non-ISO currencies
    let currency = wire.iso_currency_code.or(wire.unofficial_currency_code);

    Transaction {
        id: TransactionId::new(wire.transaction_id),
        account_id: wire.account_id,
        date,
        amount: wire.amount,
        currency,
        name: wire.name,
        pending: wire.pending,
        extra: wire.extra,
    }
}

/// Parse a provider calendar date (YYYY-MM-DD)
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
