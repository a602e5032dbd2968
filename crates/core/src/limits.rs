//! Size limits for documents and paths
//!
//! Limits are checked on every write before anything reaches the backing
//! store. A violating write is rejected with [`LimitError`] and nothing is
//! persisted.
//!
//! | Limit | Default | Constant |
//! |-------|---------|----------|
//! | Max encoded record size | 16 MB | [`MAX_DOCUMENT_SIZE`] |
//! | Max nesting depth | 100 levels | [`MAX_NESTING_DEPTH`] |
//! | Max path length | 256 segments | [`MAX_PATH_LENGTH`] |

use crate::document::Document;
use thiserror::Error;

/// Maximum encoded record size in bytes (16 MB)
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Maximum nesting depth of a document (100 levels)
///
/// Kept below serde_json's recursion limit so every accepted document can be
/// decoded again.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Maximum path length in segments (256 segments)
pub const MAX_PATH_LENGTH: usize = 256;

/// Error type for limit violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Encoded record exceeds maximum size
    #[error("document size {size} exceeds maximum of {max} bytes")]
    DocumentTooLarge {
        /// Actual encoded size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Document nesting exceeds maximum depth
    #[error("document nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Path exceeds maximum length
    #[error("path length {length} exceeds maximum of {max} segments")]
    PathTooLong {
        /// Actual path length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
}

/// Limits enforced by the store facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum encoded record size in bytes
    pub max_document_size: usize,
    /// Maximum nesting depth
    pub max_nesting_depth: usize,
    /// Maximum number of path segments
    pub max_path_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_document_size: MAX_DOCUMENT_SIZE,
            max_nesting_depth: MAX_NESTING_DEPTH,
            max_path_length: MAX_PATH_LENGTH,
        }
    }
}

impl Limits {
    /// Small limits for tests that need to hit the boundaries cheaply
    pub fn with_small_limits() -> Self {
        Limits {
            max_document_size: 256,
            max_nesting_depth: 4,
            max_path_length: 8,
        }
    }

    /// Validate the number of segments in a path
    pub fn validate_path_length(&self, length: usize) -> Result<(), LimitError> {
        if length > self.max_path_length {
            return Err(LimitError::PathTooLong {
                length,
                max: self.max_path_length,
            });
        }
        Ok(())
    }

    /// Validate the nesting depth of a document
    pub fn validate_depth(&self, doc: &Document) -> Result<(), LimitError> {
        let depth = doc.nesting_depth();
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                depth,
                max: self.max_nesting_depth,
            });
        }
        Ok(())
    }

    /// Validate the size of an encoded record
    pub fn validate_size(&self, size: usize) -> Result<(), LimitError> {
        if size > self.max_document_size {
            return Err(LimitError::DocumentTooLarge {
                size,
                max: self.max_document_size,
            });
        }
        Ok(())
    }
}
