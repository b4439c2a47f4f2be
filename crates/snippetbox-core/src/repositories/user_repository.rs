//! User repository trait (port)

use async_trait::async_trait;

use crate::domain::User;
use crate::error::DomainError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Hash `password` and store a new user. A taken email yields [`DomainError::DuplicateEmail`].
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), DomainError>;

    /// Returns the user id when email and password match, otherwise
    /// [`DomainError::InvalidCredentials`].
    async fn authenticate(&self, email: &str, password: &str) -> Result<i64, DomainError>;

    async fn exists(&self, id: i64) -> Result<bool, DomainError>;

    async fn get(&self, id: i64) -> Result<User, DomainError>;

    /// Replace the password hash after re-checking `current_password`.
    async fn password_update(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DomainError>;
}
