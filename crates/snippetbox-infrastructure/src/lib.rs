//! # Snippetbox Infrastructure
//!
//! MySQL implementations of the repository and session-store ports.

pub mod database;

pub use database::{create_pool, MySqlSessionStore, MySqlSnippetRepository, MySqlUserRepository};
