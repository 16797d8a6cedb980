//! Error types for the intake engine.
//!
//! Field-level validation failures are deliberately NOT represented here —
//! they are `FieldErrors` values (see `rules`), surfaced inline per field
//! and never propagated past a step boundary.

/// Top-level error type for the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the external collaborator services (file store, pincode
/// lookup, record creation). Whether a service error is fatal depends on
/// the call site: upload failures are soft, creation failures are not.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),

    #[error("Pincode {0} not found")]
    PincodeNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
