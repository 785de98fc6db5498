//! Common error types for Larder

use thiserror::Error;

/// Common result type for Larder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the Larder crates
#[derive(Error, Debug)]
pub enum Error {
    /// Local store operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of a stored collection failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
