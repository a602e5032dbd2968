//! Error types for NotNoDb
//!
//! This module defines the single error enum shared by every layer.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! "Record not found" and "sub-path not found" are deliberately absent from
//! this taxonomy: they surface as `Ok(None)` from reads.

use std::io;
use thiserror::Error;

use crate::limits::LimitError;

/// Result type alias for NotNoDb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for NotNoDb
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed key syntax (empty key, empty segment, too many segments)
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending key as given by the caller
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// Append target exists and is not an array
    #[error("Not an array: '{path}' holds a {found}, use put to make it an array first")]
    NotAnArray {
        /// Full key of the append target
        path: String,
        /// Type name of the node found there
        found: &'static str,
    },

    /// Stored bytes failed to decode as a document (or into the requested shape)
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Backing-store failure (connectivity, constraint violation, partition creation)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Document or path exceeds a configured limit
    #[error("Limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an `InvalidPath` error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a `Storage` error from anything displayable
    pub fn storage(msg: impl std::fmt::Display) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Build a `Config` error from anything displayable
    pub fn config(msg: impl std::fmt::Display) -> Self {
        Error::Config(msg.to_string())
    }

    /// True for `InvalidPath`
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Error::InvalidPath { .. })
    }

    /// True for `NotAnArray`
    pub fn is_not_an_array(&self) -> bool {
        matches!(self, Error::NotAnArray { .. })
    }

    /// True for `CorruptData`
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, Error::CorruptData(_))
    }

    /// True for `Storage`
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::CorruptData(e.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
