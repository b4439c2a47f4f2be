// ============================================================================
// Snippetbox Core - Snippet Entity
// File: crates/snippetbox-core/src/domain/snippet.rs
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short text entry that stops being visible once `expires` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}
