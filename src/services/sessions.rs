//! Session manager: opaque tokens referencing server-side session records

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use uuid::Uuid;

use crate::{error::AppResult, models::user::User, services::users::UsersService};

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct SessionRecord {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Server-side session records, keyed by opaque token.
///
/// Single-process in-memory backing; sessions are not shared across
/// processes. The server-side expiry is sliding (each successful lookup
/// pushes it forward), but the session cookie carries a fixed max-age from
/// issuance, so the cookie lifetime bounds the overall session.
#[derive(Clone)]
pub struct SessionStore {
    ttl: Duration,
    inner: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl SessionStore {
    pub fn new(ttl_hours: u64) -> Self {
        Self {
            ttl: Duration::hours(ttl_hours as i64),
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a session for a user and return its opaque token.
    ///
    /// Expired records are swept here, so abandoned sessions cannot
    /// accumulate past the next login.
    pub fn insert(&self, user_id: Uuid) -> String {
        let token = generate_token();
        let now = Utc::now();
        let record = SessionRecord {
            user_id,
            expires_at: now + self.ttl,
        };
        let mut sessions = self.inner.write().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, r| r.expires_at > now);
        sessions.insert(token.clone(), record);
        token
    }

    /// Resolve a token to its user id, refreshing the sliding expiry.
    /// Expired records are dropped on access.
    pub fn get(&self, token: &str) -> Option<Uuid> {
        let mut sessions = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        match sessions.get_mut(token) {
            Some(record) if record.expires_at > now => {
                record.expires_at = now + self.ttl;
                Some(record.user_id)
            }
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// Destroy a session; removing an absent token is not an error
    pub fn remove(&self, token: &str) {
        let mut sessions = self.inner.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(token);
    }

    #[cfg(test)]
    fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        let sessions = self.inner.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(token).map(|r| r.expires_at)
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Serializes authenticated users into session tokens and restores them on
/// subsequent requests. Only the user id ever enters the session payload.
#[derive(Clone)]
pub struct SessionsService {
    users: UsersService,
    store: SessionStore,
}

impl SessionsService {
    pub fn new(users: UsersService, store: SessionStore) -> Self {
        Self { users, store }
    }

    /// Open a session for an authenticated user
    pub fn open(&self, user: &User) -> String {
        self.store.insert(user.id)
    }

    /// Restore the user behind a session token.
    ///
    /// Absent token, expired session, and vanished user all resolve to
    /// `None` (anonymous request), never an error.
    pub async fn resolve(&self, token: &str) -> AppResult<Option<User>> {
        let Some(user_id) = self.store.get(token) else {
            return Ok(None);
        };
        self.users.find_by_id(user_id).await
    }

    /// Destroy a session; idempotent
    pub fn close(&self, token: &str) {
        self.store.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_resolves_to_inserted_user() {
        let store = SessionStore::new(24);
        let user_id = Uuid::new_v4();
        let token = store.insert(user_id);
        assert_eq!(store.get(&token), Some(user_id));
    }

    #[test]
    fn tokens_are_unique_and_opaque() {
        let store = SessionStore::new(24);
        let user_id = Uuid::new_v4();
        let a = store.insert(user_id);
        let b = store.insert(user_id);
        assert_ne!(a, b);
        assert!(!a.contains(&user_id.to_string()));
    }

    #[test]
    fn expired_session_is_dropped_on_access() {
        let store = SessionStore::new(0);
        let token = store.insert(Uuid::new_v4());
        assert_eq!(store.get(&token), None);
        // record was removed, not just hidden
        assert!(store.expires_at(&token).is_none());
    }

    #[test]
    fn expiry_slides_forward_on_access() {
        let store = SessionStore::new(24);
        let token = store.insert(Uuid::new_v4());
        let before = store.expires_at(&token).unwrap();
        store.get(&token);
        let after = store.expires_at(&token).unwrap();
        assert!(after >= before);
    }

    #[test]
    fn abandoned_sessions_are_swept_on_insert() {
        let store = SessionStore::new(0);
        let stale = store.insert(Uuid::new_v4());
        let store = SessionStore {
            ttl: Duration::hours(24),
            inner: store.inner.clone(),
        };
        store.insert(Uuid::new_v4());
        // the stale record is gone without ever being presented
        assert!(store.expires_at(&stale).is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let store = SessionStore::new(24);
        let token = store.insert(Uuid::new_v4());
        store.remove(&token);
        store.remove(&token);
        assert_eq!(store.get(&token), None);
    }

    #[test]
    fn unknown_token_is_anonymous() {
        let store = SessionStore::new(24);
        assert_eq!(store.get("no-such-token"), None);
    }
}
