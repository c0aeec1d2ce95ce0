//! Bearer-token session store.
//!
//! ARCHITECTURE
//! ============
//! Tokens are random 32-byte hex strings mapped to the authenticated user
//! and an expiry instant. The store lives in memory only: restarting the
//! server invalidates every token.
//!
//! TRADE-OFFS
//! ==========
//! Expired entries are pruned lazily on issue and on validation instead of by
//! a background task; the map stays small for a single-operator service.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::RwLock;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// User attached to a valid token.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionUser {
    pub username: String,
}

#[derive(Debug, Clone)]
struct Session {
    user: SessionUser,
    expires_at: Instant,
}

/// Shared token store. Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new token for `username`.
    pub async fn create_session(&self, username: &str) -> String {
        let token = generate_token();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token.clone(),
            Session { user: SessionUser { username: username.to_owned() }, expires_at: now + self.ttl },
        );
        token
    }

    /// Return the user for `token` if it exists and has not expired.
    pub async fn validate_session(&self, token: &str) -> Option<SessionUser> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(s) if s.expires_at > now => return Some(s.user.clone()),
                None => return None,
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    /// Revoke `token`. Returns whether it existed.
    pub async fn delete_session(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Number of stored tokens, expired ones included until pruned.
    pub async fn stored_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
