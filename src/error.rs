//! Error types for dropzone-saver.

use std::path::PathBuf;

use thiserror::Error;

/// Common error type for dropzone-saver.
#[derive(Error, Debug)]
pub enum SaverError {
    /// I/O error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// A batch directory name is already taken by something else.
    #[error("path {} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The `latest` name is occupied by something other than a symlink.
    #[error("{} exists and is not a symlink", .0.display())]
    NotASymlink(PathBuf),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for configuration or user input.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for dropzone-saver operations.
pub type Result<T> = std::result::Result<T, SaverError>;
