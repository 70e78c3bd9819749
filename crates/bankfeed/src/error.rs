//! Error taxonomy for provider sync operations
//!
//! "Not ready" is deliberately absent here: an empty-cursor response is a
//! protocol signal carried by [`SyncPoll`](crate::provider::SyncPoll), not
//! a failure, and it never reaches the caller.

use thiserror::Error;

/// Failures surfaced by the sync pipeline and provider client.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An operation needed a credential but no account is linked.
    #[error("no linked bank account; complete the link flow first")]
    NotConnected,

    /// The provider answered at the transport level but reported a
    /// business error (invalid credential, rate limit, ...).
    #[error("provider error {code}: {message}")]
    Remote {
        code: String,
        message: String,
        display_message: Option<String>,
    },

    /// Network-level failure before any provider response was obtained.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider response could not be decoded.
    #[error("invalid provider response: {0}")]
    Decode(String),

    /// The provider kept reporting "still processing" past the attempt cap.
    #[error("transaction data not ready after {attempts} polls")]
    Timeout { attempts: u32 },

    /// The run was cancelled at a suspension point.
    #[error("sync cancelled")]
    Cancelled,
}

impl SyncError {
    /// True when the failure is the caller's to fix, as opposed to an
    /// upstream or network condition.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SyncError::NotConnected)
    }

    /// True when repeating the same request later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Transport(_) | SyncError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::Remote {
            code: "ITEM_LOGIN_REQUIRED".into(),
            message: "the login details of this item have changed".into(),
            display_message: None,
        };
        assert!(err.to_string().contains("ITEM_LOGIN_REQUIRED"));

        let err = SyncError::Timeout { attempts: 30 };
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_classification() {
        assert!(SyncError::NotConnected.is_client_error());
        assert!(!SyncError::Cancelled.is_client_error());

        assert!(SyncError::Transport("connection reset".into()).is_retryable());
        assert!(SyncError::Timeout { attempts: 30 }.is_retryable());
        assert!(!SyncError::NotConnected.is_retryable());
        assert!(
            !SyncError::Remote {
                code: "RATE_LIMIT".into(),
                message: "slow down".into(),
                display_message: None,
            }
            .is_retryable()
        );
    }
}
