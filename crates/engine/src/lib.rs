//! Store facade for NotNoDb
//!
//! This crate wires the core algorithms to a backing store:
//! - Store: get / put / add / delete by dot path, typed reads, whole-record
//!   access to the reserved root partition
//! - StoreConfig: `notnodb.toml` loading and defaults
//!
//! The engine is the only component that knows how a path maps onto
//! collections and records.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod store;

pub use config::{StoreConfig, CONFIG_FILE_NAME};
pub use store::{Store, ROOT_COLLECTION};
