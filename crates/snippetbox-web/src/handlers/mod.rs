pub mod account;
pub mod health;
pub mod pages;
pub mod snippets;
pub mod users;

use crate::error::WebError;

/// Fallback for unmatched routes.
pub async fn not_found() -> WebError {
    WebError::NotFound
}
