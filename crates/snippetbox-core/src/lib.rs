//! # Snippetbox Core
//!
//! Domain entities, repository traits, errors, and form validation.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod validator;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use validator::Validator;
