// Session token slot. Single owner of the credential lifecycle: login flows
// write it, logout clears it, every client reads it through here. Reads are
// synchronous and never block on I/O.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;

// Mirrors the 7-day cookie window the dashboard uses for the access token.
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone)]
struct Slot {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    slot: RwLock<Option<Slot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Current token, or None when no token is stored or the stored one has
    // passed its expiry. Absence is not an error; callers decide whether it
    // blocks an operation.
    pub fn token(&self) -> Option<String> {
        let slot = self.slot.read();
        match slot.as_ref() {
            Some(slot) if slot.expires_at > Utc::now() => Some(slot.token.clone()),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.set_token_with_ttl(token, Duration::days(TOKEN_TTL_DAYS));
    }

    pub fn set_token_with_ttl(&self, token: impl Into<String>, ttl: Duration) {
        let mut slot = self.slot.write();
        *slot = Some(Slot {
            token: token.into(),
            expires_at: Utc::now() + ttl,
        });
        debug!(ttl_seconds = ttl.num_seconds(), "session token stored");
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write();
        *slot = None;
        debug!("session token cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_token() {
        let store = SessionStore::new();
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn set_then_clear_round_trip() {
        let store = SessionStore::new();
        store.set_token("abc123");
        assert_eq!(store.token().as_deref(), Some("abc123"));
        assert!(store.is_authenticated());

        store.clear();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn expired_token_reads_as_absent() {
        let store = SessionStore::new();
        store.set_token_with_ttl("stale", Duration::seconds(-1));
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn new_token_replaces_previous_one() {
        let store = SessionStore::new();
        store.set_token("first");
        store.set_token("second");
        assert_eq!(store.token().as_deref(), Some("second"));
    }
}
