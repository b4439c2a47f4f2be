//! Server-side session state and the storage port behind it.
//!
//! The browser only ever holds an opaque random token; everything else lives in a
//! [`SessionStore`]. Tokens are swapped (never the data) whenever the privilege level of
//! the session changes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Session backend error: {0}")]
    Backend(String),

    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Everything the application keeps per visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub authenticated_user_id: Option<i64>,
    /// One-shot message shown on the next rendered page.
    pub flash: Option<String>,
    /// Path a protected request was bounced from; consumed by the next login.
    pub redirect_after_login: Option<String>,
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub data: SessionData,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(data: SessionData, expires_at: DateTime<Utc>) -> Self {
        Self { data, expires_at }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// 32 random bytes, hex encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `None` for unknown or expired tokens.
    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionStoreError>;

    async fn save(&self, token: &str, record: &SessionRecord) -> Result<(), SessionStoreError>;

    async fn destroy(&self, token: &str) -> Result<(), SessionStoreError>;

    /// Move `record` from `old_token` to `new_token`; the old token stops resolving.
    async fn rotate(
        &self,
        old_token: &str,
        new_token: &str,
        record: &SessionRecord,
    ) -> Result<(), SessionStoreError> {
        self.destroy(old_token).await?;
        self.save(new_token, record).await
    }
}

/// Process-local store. Sessions vanish on restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        let record = self.sessions.get(token).map(|r| r.value().clone());
        match record {
            Some(r) if r.is_expired() => {
                self.sessions.remove(token);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn save(&self, token: &str, record: &SessionRecord) -> Result<(), SessionStoreError> {
        self.sessions.insert(token.to_string(), record.clone());
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionStoreError> {
        self.sessions.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_with_user(id: i64, ttl: Duration) -> SessionRecord {
        SessionRecord::new(
            SessionData {
                authenticated_user_id: Some(id),
                ..Default::default()
            },
            Utc::now() + ttl,
        )
    }

    #[test]
    fn test_tokens_are_random() {
        let a = generate_session_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, generate_session_token());
    }

    #[tokio::test]
    async fn test_save_load_destroy() {
        let store = MemorySessionStore::new();
        let record = record_with_user(1, Duration::hours(1));

        store.save("abc", &record).await.unwrap();
        assert_eq!(store.load("abc").await.unwrap(), Some(record));

        store.destroy("abc").await.unwrap();
        assert_eq!(store.load("abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_sessions_do_not_load() {
        let store = MemorySessionStore::new();
        store
            .save("old", &record_with_user(1, Duration::seconds(-1)))
            .await
            .unwrap();

        assert_eq!(store.load("old").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_rotate_moves_data_to_new_token() {
        let store = MemorySessionStore::new();
        let record = record_with_user(7, Duration::hours(1));
        store.save("before", &record).await.unwrap();

        store.rotate("before", "after", &record).await.unwrap();

        assert_eq!(store.load("before").await.unwrap(), None);
        assert_eq!(
            store.load("after").await.unwrap().unwrap().data.authenticated_user_id,
            Some(7)
        );
    }
}
