//! # Snippetbox Web
//!
//! HTTP layer: router, middleware, handlers, forms and server-rendered templates.

pub mod context;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;

#[cfg(test)]
mod test;

pub use error::WebError;
pub use routes::build_router;
pub use session::{Session, SessionConfig, SessionManager};
pub use state::AppState;
