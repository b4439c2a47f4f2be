//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Row is absent, or (for snippets) already expired.
    #[error("No matching record found")]
    NotFound,

    #[error("Duplicate email")]
    DuplicateEmail,

    /// Unknown email or wrong password; the two are not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),
}
