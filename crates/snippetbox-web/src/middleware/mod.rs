//! Request middleware, outermost first: panic recovery, request logging, security headers,
//! then (dynamic routes only) session load/save, CSRF, authentication state and the
//! route guard.

pub mod auth;
pub mod csrf;
pub mod logging;
pub mod panic;
pub mod security_headers;
pub mod session;

pub use auth::{authenticate, require_authentication};
pub use csrf::csrf_protect;
pub use logging::log_request;
pub use panic::handle_panic;
pub use security_headers::secure_headers;
pub use session::load_and_save;
