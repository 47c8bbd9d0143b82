//! # Host Error Types
//!
//! All errors that can occur while running the game host.

use starbase_core::ActorError;
use thiserror::Error;

/// Errors that can occur in the game host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// An actor operation failed.
    #[error("actor error: {0}")]
    Actor(#[from] ActorError),

    /// Invalid configuration or input script.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A file could not be read.
    #[error("cannot read {path}: {reason}")]
    Io {
        /// The file that was being read.
        path: String,
        /// The underlying I/O error.
        reason: String,
    },
}

/// Result type for host operations.
pub type AppResult<T> = Result<T, AppError>;
