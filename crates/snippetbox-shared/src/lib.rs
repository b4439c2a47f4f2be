//! # Snippetbox Shared
//!
//! Configuration, telemetry, and startup errors shared by every Snippetbox crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;
pub mod utils;

pub use config::Settings;
pub use error::AppError;
