//! Error types for the pose piano library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Melody cannot be played (empty, out-of-range notes, only rests)
    #[error("Invalid melody: {0}")]
    InvalidMelody(String),

    /// Unknown or malformed wrist smoothing setting
    #[error("Smoothing error: {0}")]
    SmoothingError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Recorded session could not be read or written
    #[error("Session error: {0}")]
    SessionError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
