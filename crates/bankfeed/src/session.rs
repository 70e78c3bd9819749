//! Session state for the linked bank item
//!
//! The host process keeps exactly one active credential at a time: the
//! access token and item ID produced by the public-token exchange. Reads
//! and the rotation write share one lock so a credential swap never
//! interleaves with a token read.

use std::sync::RwLock;

use serde::Serialize;

use crate::error::SyncError;

/// Credential pair produced by a public-token exchange
#[derive(Debug, Clone)]
pub struct LinkedItem {
    pub access_token: String,
    pub item_id: String,
}

/// Connection status safe to expose at the boundary.
///
/// Never carries the access token.
#[derive(Debug, Clone, Serialize)]
pub struct ItemStatus {
    pub item_id: Option<String>,
    pub connected: bool,
    pub environment: String,
    pub products: Vec<String>,
}

/// Holder of the single active credential.
///
/// Unset until the first exchange; a later exchange overwrites both
/// fields atomically.
#[derive(Debug, Default)]
pub struct SessionState {
    item: RwLock<Option<LinkedItem>>,
}

impl SessionState {
    /// Create a disconnected session
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly exchanged credential pair, replacing any previous
    /// link.
    pub fn connect(&self, access_token: impl Into<String>, item_id: impl Into<String>) {
        let mut item = self.item.write().unwrap();
        *item = Some(LinkedItem {
            access_token: access_token.into(),
            item_id: item_id.into(),
        });
    }

    /// Whether an account is currently linked
    pub fn is_connected(&self) -> bool {
        self.item.read().unwrap().is_some()
    }

    /// Access token for provider calls
    pub fn access_token(&self) -> Result<String, SyncError> {
        self.item
            .read()
            .unwrap()
            .as_ref()
            .map(|item| item.access_token.clone())
            .ok_or(SyncError::NotConnected)
    }

    /// Item ID of the current link, if any
    pub fn item_id(&self) -> Option<String> {
        self.item
            .read()
            .unwrap()
            .as_ref()
            .map(|item| item.item_id.clone())
    }

    /// Boundary view of the session. The access token itself is never
    /// included.
    pub fn status(&self, environment: &str, products: &[&str]) -> ItemStatus {
        let item = self.item.read().unwrap();
        ItemStatus {
            item_id: item.as_ref().map(|i| i.item_id.clone()),
            connected: item.is_some(),
            environment: environment.to_string(),
            products: products.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disconnected() {
        let session = SessionState::new();
        assert!(!session.is_connected());
        assert!(session.item_id().is_none());
        assert!(matches!(
            session.access_token(),
            Err(SyncError::NotConnected)
        ));
    }

    #[test]
    fn test_connect_sets_both_fields() {
        let session = SessionState::new();
        session.connect("access-token-1", "item-1");

        assert!(session.is_connected());
        assert_eq!(session.access_token().unwrap(), "access-token-1");
        assert_eq!(session.item_id().as_deref(), Some("item-1"));
    }

    #[test]
    fn test_reconnect_overwrites() {
        let session = SessionState::new();
        session.connect("access-token-1", "item-1");
        session.connect("access-token-2", "item-2");

        assert_eq!(session.access_token().unwrap(), "access-token-2");
        assert_eq!(session.item_id().as_deref(), Some("item-2"));
    }

    #[test]
    fn test_status_never_exposes_token() {
        let session = SessionState::new();
        session.connect("secret-token", "item-1");

        let status = session.status("sandbox", &["transactions"]);
        assert!(status.connected);
        assert_eq!(status.item_id.as_deref(), Some("item-1"));

        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("secret-token"));
    }
}
