// ============================================================================
// Snippetbox Infrastructure - MySQL User Repository
// File: crates/snippetbox-infrastructure/src/database/mysql/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::{error, info, warn};

use snippetbox_core::domain::User;
use snippetbox_core::error::DomainError;
use snippetbox_core::repositories::UserRepository;
use snippetbox_security::PasswordService;
use snippetbox_shared::utils::mask_email;

/// Name of the unique index on `users.email`.
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_uc_email";

pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    created: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            created: row.created,
        }
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    id: i64,
    hashed_password: String,
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::Database(e.to_string())
}

fn is_duplicate_email(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() && db.message().contains(EMAIL_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

// bcrypt at cost 12 takes a few hundred milliseconds, so it runs off the async workers.
async fn hash_password(password: &str) -> Result<String, DomainError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || PasswordService::hash(&password))
        .await
        .map_err(|e| DomainError::PasswordHash(e.to_string()))?
        .map_err(|e| DomainError::PasswordHash(e.to_string()))
}

async fn verify_password(password: &str, hash: String) -> Result<bool, DomainError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || PasswordService::verify(&password, &hash))
        .await
        .map_err(|e| DomainError::PasswordHash(e.to_string()))?
        .map_err(|e| DomainError::PasswordHash(e.to_string()))
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), DomainError> {
        let hashed_password = hash_password(password).await?;

        sqlx::query(
            r#"
            INSERT INTO users (name, email, hashed_password, created)
            VALUES (?, ?, ?, UTC_TIMESTAMP())
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&hashed_password)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_duplicate_email(&e) {
                warn!("Signup rejected, email already registered: {}", mask_email(email));
                DomainError::DuplicateEmail
            } else {
                db_error("inserting user", e)
            }
        })?;

        info!("User created: {}", mask_email(email));
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, DomainError> {
        let row: Option<CredentialRow> =
            sqlx::query_as("SELECT id, hashed_password FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("looking up credentials", e))?;

        let Some(row) = row else {
            return Err(DomainError::InvalidCredentials);
        };

        if verify_password(password, row.hashed_password).await? {
            Ok(row.id)
        } else {
            Err(DomainError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT true FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("checking user existence", e))?;

        Ok(exists != 0)
    }

    async fn get(&self, id: i64) -> Result<User, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, name, email, created FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("fetching user", e))?;

        row.map(User::from).ok_or(DomainError::NotFound)
    }

    async fn password_update(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        // Read-verify-write without a transaction; a concurrent change between the two
        // statements is last-writer-wins.
        let hashed: Option<String> =
            sqlx::query_scalar("SELECT hashed_password FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("fetching password hash", e))?;

        let hashed = hashed.ok_or(DomainError::NotFound)?;

        if !verify_password(current_password, hashed).await? {
            return Err(DomainError::InvalidCredentials);
        }

        let new_hash = hash_password(new_password).await?;

        sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
            .bind(&new_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating password", e))?;

        info!("Password updated for user {}", id);
        Ok(())
    }
}
