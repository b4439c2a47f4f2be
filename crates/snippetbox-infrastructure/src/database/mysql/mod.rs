//! MySQL repository implementations

pub mod session_store_impl;
pub mod snippet_repo_impl;
pub mod user_repo_impl;

pub use session_store_impl::MySqlSessionStore;
pub use snippet_repo_impl::MySqlSnippetRepository;
pub use user_repo_impl::MySqlUserRepository;
