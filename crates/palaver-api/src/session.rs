use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

struct SessionEntry {
    username: String,
    expires_at: DateTime<Utc>,
}

/// Maps opaque session tokens to logged-in usernames.
///
/// Tokens are random (uuid v4), created at login, destroyed at logout, and
/// expire after a sliding TTL — authenticating a live session pushes its
/// expiry forward. Expired entries are dropped on the lookup that finds them.
pub struct SessionStore {
    inner: Mutex<HashMap<String, SessionEntry>>,
    ttl: TimeDelta,
}

impl SessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a session for `username`, returning the cookie token.
    pub fn create(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.lock();
        sessions.insert(
            token.clone(),
            SessionEntry {
                username: username.to_string(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its username, refreshing the expiry. Returns
    /// `None` for unknown or expired tokens.
    pub fn authenticate(&self, token: &str) -> Option<String> {
        let mut sessions = self.lock();
        match sessions.get_mut(token) {
            Some(entry) if entry.expires_at > Utc::now() => {
                entry.expires_at = Utc::now() + self.ttl;
                Some(entry.username.clone())
            }
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// End a session. Removing an unknown token is a no-op.
    pub fn remove(&self, token: &str) {
        self.lock().remove(token);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
        // A poisoned map only means another thread panicked mid-insert;
        // the entries themselves are still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
