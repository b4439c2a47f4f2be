// ============================================================================
// Snippetbox Infrastructure - MySQL Session Store
// File: crates/snippetbox-infrastructure/src/database/mysql/session_store_impl.rs
// ============================================================================
//! Session persistence in the `sessions` table (token, JSON payload, expiry).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use snippetbox_security::session::{SessionData, SessionRecord, SessionStore, SessionStoreError};

pub struct MySqlSessionStore {
    pool: MySqlPool,
}

impl MySqlSessionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn delete_expired(&self) -> Result<u64, SessionStoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expiry < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected())
    }

    /// Periodically purge expired rows. Loading already ignores them; this only keeps the
    /// table small.
    pub fn spawn_cleanup(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                match self.delete_expired().await {
                    Ok(0) => {}
                    Ok(n) => info!("Cleaned up {} expired sessions", n),
                    Err(e) => error!("Session cleanup failed: {}", e),
                }
            }
        })
    }
}

#[derive(Debug, FromRow)]
struct SessionRow {
    data: Vec<u8>,
    expiry: DateTime<Utc>,
}

fn backend(e: sqlx::Error) -> SessionStoreError {
    SessionStoreError::Backend(e.to_string())
}

const UPSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, data, expiry)
    VALUES (?, ?, ?)
    ON DUPLICATE KEY UPDATE data = VALUES(data), expiry = VALUES(expiry)
"#;

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn load(&self, token: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT data, expiry FROM sessions WHERE token = ?")
                .bind(token)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let record = SessionRecord::new(serde_json::from_slice::<SessionData>(&row.data)?, row.expiry);
        if record.is_expired() {
            debug!("Ignoring expired session");
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn save(&self, token: &str, record: &SessionRecord) -> Result<(), SessionStoreError> {
        let data = serde_json::to_vec(&record.data)?;
        sqlx::query(UPSERT_SESSION)
            .bind(token)
            .bind(data)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn destroy(&self, token: &str) -> Result<(), SessionStoreError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn rotate(
        &self,
        old_token: &str,
        new_token: &str,
        record: &SessionRecord,
    ) -> Result<(), SessionStoreError> {
        let data = serde_json::to_vec(&record.data)?;
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(old_token)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        sqlx::query(UPSERT_SESSION)
            .bind(new_token)
            .bind(data)
            .bind(record.expires_at)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(())
    }
}
