//! In-memory session store and signed session cookies.
//!
//! Tokens are random; the cookie carries `token.signature` where the
//! signature is HMAC-SHA256 over the token with the configured secret.
//! A cookie that fails verification never reaches the store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "fc_session";

struct Entry {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct SessionStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a user and return its token.
    pub fn create(&self, user_id: i64, ttl_min: i64) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let entry = Entry {
            user_id,
            expires_at: Utc::now() + Duration::minutes(ttl_min),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(token.clone(), entry);
        token
    }

    /// Resolve a token to a user id, ignoring expired entries.
    pub fn resolve(&self, token: &str) -> Option<i64> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(token)?;
        if entry.expires_at <= Utc::now() {
            return None;
        }
        Some(entry.user_id)
    }

    /// End a session.
    pub fn remove(&self, token: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token);
    }

    /// Drop expired entries; returns how many were purged.
    pub fn vacuum(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }
}

/// Periodically purge expired sessions.
pub fn spawn_vacuum_task(store: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let purged = store.vacuum();
            if purged > 0 {
                tracing::debug!("Vacuumed {} expired sessions", purged);
            }
        }
    });
}

fn sign(secret: &str, token: &str) -> String {
    // HMAC-SHA256 accepts keys of any length, so construction cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Full Set-Cookie value establishing a session.
pub fn cookie_value(secret: &str, token: &str) -> String {
    format!(
        "{}={}.{}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE,
        token,
        sign(secret, token)
    )
}

/// Set-Cookie value that clears the session cookie.
pub fn clear_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}

/// Verify a `token.signature` cookie value and extract the token.
pub fn verify_cookie(secret: &str, value: &str) -> Option<String> {
    let (token, sig) = value.split_once('.')?;
    let sig_bytes = hex::decode(sig).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(token.as_bytes());
    mac.verify_slice(&sig_bytes).ok()?;

    Some(token.to_string())
}

/// Extract and verify the session token from request headers.
pub fn token_from_headers(headers: &HeaderMap, secret: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookies.split(';') {
        if let Some(value) = part.trim().strip_prefix(SESSION_COOKIE) {
            if let Some(value) = value.strip_prefix('=') {
                return verify_cookie(secret, value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_resolve_round_trip() {
        let store = SessionStore::new();
        let token = store.create(7, 60);
        assert_eq!(store.resolve(&token), Some(7));
    }

    #[test]
    fn expired_session_does_not_resolve() {
        let store = SessionStore::new();
        let token = store.create(7, 0);
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn remove_ends_session() {
        let store = SessionStore::new();
        let token = store.create(7, 60);
        store.remove(&token);
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn vacuum_purges_only_expired_entries() {
        let store = SessionStore::new();
        let live = store.create(1, 60);
        store.create(2, 0);
        assert_eq!(store.vacuum(), 1);
        assert_eq!(store.resolve(&live), Some(1));
    }

    #[test]
    fn cookie_round_trip_verifies() {
        let value = cookie_value("secret", "abc123");
        let raw = value
            .strip_prefix("fc_session=")
            .and_then(|v| v.split(';').next())
            .unwrap();
        assert_eq!(verify_cookie("secret", raw), Some("abc123".to_string()));
    }

    #[test]
    fn tampered_cookie_is_rejected() {
        let raw = format!("evil.{}", sign("secret", "abc123"));
        assert_eq!(verify_cookie("secret", &raw), None);
        assert_eq!(verify_cookie("other-secret", &format!("abc123.{}", sign("secret", "abc123"))), None);
    }

    #[test]
    fn token_extracted_among_other_cookies() {
        let token = "abc123";
        let mut headers = HeaderMap::new();
        let cookie = format!(
            "theme=dark; fc_session={}.{}; lang=en",
            token,
            sign("secret", token)
        );
        headers.insert(header::COOKIE, cookie.parse().unwrap());
        assert_eq!(
            token_from_headers(&headers, "secret"),
            Some(token.to_string())
        );
        assert_eq!(token_from_headers(&headers, "wrong"), None);
    }
}
