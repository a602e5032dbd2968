//! Core types and algorithms for NotNoDb
//!
//! This crate defines everything that does not touch a physical store:
//! - KeyPath / SubPath: dot-delimited key parsing and root/sub-path split
//! - Document: recursive tagged value, the unit of storage and merge
//! - codec: Document <-> bytes, typed reads with an explicit DecodePolicy
//! - overlay: get / set / append / remove at a sub-path (the merge engine)
//! - limits: document size, nesting depth and path length limits
//! - Error: error type hierarchy
//! - BackingStore: the interface persistence adapters implement

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod document;
pub mod error;
pub mod limits;
pub mod overlay;
pub mod path;
pub mod traits;

pub use codec::DecodePolicy;
pub use document::{DocMap, Document};
pub use error::{Error, Result};
pub use limits::{
    LimitError, Limits, MAX_DOCUMENT_SIZE, MAX_NESTING_DEPTH, MAX_PATH_LENGTH,
};
pub use overlay::{AppendRejected, Removal};
pub use path::{KeyPath, SubPath};
pub use traits::BackingStore;
