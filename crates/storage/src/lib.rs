//! Backing-store adapters for NotNoDb
//!
//! This crate implements `notnodb_core::BackingStore` twice:
//! - SqliteStore: one SQLite table per collection, upsert by primary key
//! - MemoryStore: DashMap of DashMaps, for tests and ephemeral stores
//!
//! Both create collections lazily on first write and memoize creation per
//! instance. Reads never create anything.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod memory;
pub mod sqlite;

pub use config::{SqliteConfig, SynchronousMode, DEFAULT_TABLE_PREFIX};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
