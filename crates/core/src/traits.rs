//! Backing-store abstraction
//!
//! This module defines the narrow interface the store facade needs from the
//! persistence layer, so the SQLite adapter, the in-memory adapter or any
//! other partitioned key/value store can be swapped without touching the
//! merge engine.

use crate::error::Result;

/// Partitioned key/value store holding one whole record per key
///
/// A *collection* is a named partition created lazily on first write. Each
/// collection maps string keys to opaque byte records.
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
///
/// # Contract
///
/// - `ensure_collection` is idempotent, cached per instance, and safe under
///   concurrent first use (including from other instances or processes).
/// - `upsert` ensures the collection itself. `read` and `delete_record`
///   never create one: against a missing collection they return `Ok(None)`
///   and `Ok(())` without side effects.
/// - `upsert` is an atomic insert-or-replace per `(collection, key)`:
///   concurrent upserts never produce duplicate rows or torn values.
///   Last writer wins.
/// - `delete_record` is idempotent.
/// - Failures are reported as `Error::Storage`; adapters decide their own
///   retry policy, callers perform none.
pub trait BackingStore: Send + Sync {
    /// Create the named partition if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the partition cannot be created.
    fn ensure_collection(&self, name: &str) -> Result<()>;

    /// Fetch the record stored under `key`
    ///
    /// Returns `Ok(None)` if the record was never written (or was deleted).
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the read fails.
    fn read(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically insert or replace the record stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the write fails; the previously stored
    /// record is then unchanged.
    fn upsert(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<()>;

    /// Physically remove the record stored under `key`
    ///
    /// Removing an absent record succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the delete fails.
    fn delete_record(&self, collection: &str, key: &str) -> Result<()>;
}

impl<T: BackingStore + ?Sized> BackingStore for std::sync::Arc<T> {
    fn ensure_collection(&self, name: &str) -> Result<()> {
        (**self).ensure_collection(name)
    }

    fn read(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(collection, key)
    }

    fn upsert(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).upsert(collection, key, bytes)
    }

    fn delete_record(&self, collection: &str, key: &str) -> Result<()> {
        (**self).delete_record(collection, key)
    }
}
