//! Error types for the log tailer.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tail session operations.
///
/// Every variant except `InvalidPath` and `InvalidConfig` ends a running
/// session. Reaching end-of-file is never reported as an error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors not tied to a specific step.
    ///
    /// The session itself always reports the failing step; this conversion lets
    /// library callers use `?` on plain I/O results alongside session calls.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source file could not be opened.
    #[error("Failed to open source file {}: {source}", .path.display())]
    OpenSource {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The read cursor could not be positioned at the tracked offset.
    #[error("Failed to seek {} to offset {offset}: {source}", .path.display())]
    Seek {
        path: PathBuf,
        offset: u64,
        source: std::io::Error,
    },

    /// Reading from the source file failed.
    #[error("Failed to read source file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Opening or appending to a result file failed.
    #[error("Failed to write result file {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File path errors.
    #[error("Invalid file path: {message}")]
    InvalidPath { message: String },

    /// Session settings that cannot drive a session.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A convenient Result type for tail session operations.
pub type Result<T> = std::result::Result<T, Error>;
