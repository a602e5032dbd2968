//! NotNoDb - dot-path document store over a partitioned key/value store
//!
//! Every key is a dot-delimited path. The first segment selects a whole
//! stored document (and the collection it lives in); the remaining segments
//! address a node inside it.
//!
//! # Quick Start
//!
//! ```
//! use notnodb::{Document, Store};
//!
//! let store = Store::in_memory();
//! store.put("one.two.three.four", "content")?;
//! store.add("an.array", "one")?;
//! store.add("an.array", "two")?;
//!
//! assert_eq!(store.get("one.two.three.four")?, Some(Document::from("content")));
//! assert_eq!(store.get("an.array")?, Some(Document::from(vec!["one", "two"])));
//! assert_eq!(store.get("never.written")?, None);
//! # Ok::<(), notnodb::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `notnodb-core`: paths, documents, codec, merge engine, errors, limits
//! - `notnodb-storage`: SQLite and in-memory backing stores
//! - `notnodb-engine`: the [`Store`] facade and [`StoreConfig`]

pub use notnodb_core::codec::{self, DecodePolicy};
pub use notnodb_core::overlay;
pub use notnodb_core::{
    BackingStore, DocMap, Document, Error, KeyPath, LimitError, Limits, Result, SubPath,
};
pub use notnodb_engine::{Store, StoreConfig, CONFIG_FILE_NAME, ROOT_COLLECTION};
pub use notnodb_storage::{MemoryStore, SqliteConfig, SqliteStore, SynchronousMode};
