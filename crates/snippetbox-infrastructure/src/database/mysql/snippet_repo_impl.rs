// ============================================================================
// Snippetbox Infrastructure - MySQL Snippet Repository
// File: crates/snippetbox-infrastructure/src/database/mysql/snippet_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, error};

use snippetbox_core::domain::Snippet;
use snippetbox_core::error::DomainError;
use snippetbox_core::repositories::SnippetRepository;
use snippetbox_shared::constants::LATEST_SNIPPETS_LIMIT;

pub struct MySqlSnippetRepository {
    pool: MySqlPool,
}

impl MySqlSnippetRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SnippetRow {
    id: i64,
    title: String,
    content: String,
    created: DateTime<Utc>,
    expires: DateTime<Utc>,
}

impl From<SnippetRow> for Snippet {
    fn from(row: SnippetRow) -> Self {
        Snippet {
            id: row.id,
            title: row.title,
            content: row.content,
            created: row.created,
            expires: row.expires,
        }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::Database(e.to_string())
}

#[async_trait]
impl SnippetRepository for MySqlSnippetRepository {
    async fn insert(&self, title: &str, content: &str, expires_days: i32) -> Result<i64, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO snippets (title, content, created, expires)
            VALUES (?, ?, UTC_TIMESTAMP(), DATE_ADD(UTC_TIMESTAMP(), INTERVAL ? DAY))
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(expires_days)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("inserting snippet", e))?;

        let id = result.last_insert_id() as i64;
        debug!("Inserted snippet {}", id);
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Snippet, DomainError> {
        let row: Option<SnippetRow> = sqlx::query_as(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > UTC_TIMESTAMP() AND id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetching snippet", e))?;

        row.map(Snippet::from).ok_or(DomainError::NotFound)
    }

    async fn latest(&self) -> Result<Vec<Snippet>, DomainError> {
        let rows: Vec<SnippetRow> = sqlx::query_as(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > UTC_TIMESTAMP()
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(LATEST_SNIPPETS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing latest snippets", e))?;

        Ok(rows.into_iter().map(Snippet::from).collect())
    }
}
