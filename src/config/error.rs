//! Startup configuration failures

use thiserror::Error;

/// Why configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that the service refuses to start with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Carries the environment variable to set.
    #[error("{0} must be set")]
    MissingRequired(&'static str),

    #[error("Server port must be non-zero")]
    InvalidPort,

    #[error("Cannot bind to {0}")]
    InvalidBindAddress(String),

    #[error("Timeout out of range for {0}")]
    InvalidTimeout(&'static str),

    #[error("Database URL must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool max_connections exceeds 100")]
    PoolSizeTooLarge,

    #[error("Unsupported signature algorithm: {0}")]
    UnsupportedSignatureAlgorithm(String),

    #[error("{0} must be an http:// or https:// URL")]
    InvalidUrl(&'static str),
}
