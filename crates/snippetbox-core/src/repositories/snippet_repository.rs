//! Snippet repository trait (port)

use async_trait::async_trait;

use crate::domain::Snippet;
use crate::error::DomainError;

#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Store a snippet that expires `expires_days` from now and return its id.
    async fn insert(&self, title: &str, content: &str, expires_days: i32) -> Result<i64, DomainError>;

    /// Fails with [`DomainError::NotFound`] when the snippet is missing or expired.
    async fn get(&self, id: i64) -> Result<Snippet, DomainError>;

    /// Up to ten unexpired snippets, newest id first.
    async fn latest(&self) -> Result<Vec<Snippet>, DomainError>;
}
