//! # Error Types
//!
//! Custom error types for Kite Link using `thiserror`.

use thiserror::Error;

/// Main error type for Kite Link
#[derive(Debug, Error)]
pub enum KiteLinkError {
    /// Received frame does not have the fixed wire size
    #[error("frame length mismatch: expected {expected} bytes, got {actual}")]
    MalformedLength { expected: usize, actual: usize },

    /// Frame carries a mode word that is neither Control nor Data
    #[error("unknown message mode: {0}")]
    UnknownMode(u32),

    /// Transport errors
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Kite Link
pub type Result<T> = std::result::Result<T, KiteLinkError>;
