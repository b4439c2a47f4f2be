//! # Snippetbox Security
//!
//! Security utilities: password hashing, CSRF tokens, session state and storage.

pub mod csrf;
pub mod password;
pub mod session;

pub use password::PasswordService;
pub use session::{MemorySessionStore, SessionData, SessionRecord, SessionStore, SessionStoreError};
