//! Application error types

use thiserror::Error;

/// Failures that can stop the server from starting.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}
