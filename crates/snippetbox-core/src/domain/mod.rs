//! # Snippetbox Core - Domain Module

pub mod snippet;
pub mod user;

pub use snippet::Snippet;
pub use user::User;
