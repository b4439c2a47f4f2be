//! Repository traits (ports)

pub mod snippet_repository;
pub mod user_repository;

pub use snippet_repository::SnippetRepository;
pub use user_repository::UserRepository;
