//! Store facade
//!
//! Turns dot-path operations into whole-record reads and upserts against a
//! [`BackingStore`]. The first path segment names both the collection and
//! the record key inside it; the rest of the path addresses a node inside
//! the stored document.
//!
//! ## Write cycle
//!
//! `put`, `add` and `delete` below the root each do
//! read -> decode -> merge -> encode -> upsert. The cycle is not atomic:
//! concurrent writers under the same root segment can lose updates unless
//! root locks are enabled (`with_root_locks` / `lock_roots = true`), which
//! serialize every write to a root inside this process, whole-record writes
//! included.
//!
//! A write at the root (single-segment path) skips the read and merge and
//! replaces the record outright.

use dashmap::DashMap;
use notnodb_core::codec::{self, DecodePolicy};
use notnodb_core::overlay::{self, AppendRejected, Removal};
use notnodb_core::{BackingStore, Document, Error, KeyPath, Limits, Result};
use notnodb_storage::{MemoryStore, SqliteStore};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::StoreConfig;

/// Collection holding records written with [`Store::put_record`]
pub const ROOT_COLLECTION: &str = "notnodb_root";

/// Dot-path document store
///
/// `Store` is `Send + Sync`; share it across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use notnodb_engine::Store;
/// use notnodb_core::Document;
///
/// let store = Store::in_memory();
/// store.put("one.two.three", "content").unwrap();
/// assert_eq!(
///     store.get("one.two.three").unwrap(),
///     Some(Document::from("content"))
/// );
/// assert_eq!(store.get("one.nope").unwrap(), None);
/// ```
pub struct Store {
    backend: Arc<dyn BackingStore>,
    decode_policy: RwLock<DecodePolicy>,
    limits: Limits,
    /// Per-root write locks, present only when enabled
    root_locks: Option<DashMap<String, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("decode_policy", &*self.decode_policy.read())
            .field("limits", &self.limits)
            .field("root_locks", &self.root_locks.is_some())
            .finish()
    }
}

impl Store {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a store over any backing store
    pub fn new(backend: Arc<dyn BackingStore>) -> Self {
        Self {
            backend,
            decode_policy: RwLock::new(DecodePolicy::default()),
            limits: Limits::default(),
            root_locks: None,
        }
    }

    /// Create a store over a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Open a SQLite-backed store as described by `config`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid settings and `Error::Storage` if
    /// the database cannot be opened.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let backend = SqliteStore::open(&config.sqlite)?;
        let store = Self::new(Arc::new(backend)).with_decode_policy(config.decode_policy);
        Ok(if config.lock_roots {
            store.with_root_locks()
        } else {
            store
        })
    }

    /// Use `policy` for typed reads
    pub fn with_decode_policy(self, policy: DecodePolicy) -> Self {
        *self.decode_policy.write() = policy;
        self
    }

    /// Serialize every write per root segment
    ///
    /// Covers whole-record `put` and `delete` as well as the read-merge-write
    /// cycle. One lock is kept per root segment ever written and none are
    /// released, so the table grows with the number of collections.
    pub fn with_root_locks(mut self) -> Self {
        self.root_locks = Some(DashMap::new());
        self
    }

    /// Replace the default document limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Change the policy used by [`Store::get_as`]
    pub fn set_decode_policy(&self, policy: DecodePolicy) {
        debug!(%policy, "decode policy changed");
        *self.decode_policy.write() = policy;
    }

    /// Policy used by [`Store::get_as`]
    pub fn decode_policy(&self) -> DecodePolicy {
        *self.decode_policy.read()
    }

    /// Limits enforced on writes
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Whether root locks are enabled
    pub fn root_locks_enabled(&self) -> bool {
        self.root_locks.is_some()
    }

    /// Underlying backing store
    pub fn backend(&self) -> &Arc<dyn BackingStore> {
        &self.backend
    }

    // ========================================================================
    // Path operations
    // ========================================================================

    /// Read the node at `key`
    ///
    /// Returns `Ok(None)` when the record was never written, or the path
    /// runs through a missing key, an out-of-range index or a scalar.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` for malformed keys
    /// - `CorruptData` if the stored record does not decode
    /// - `Storage` if the read fails
    pub fn get(&self, key: &str) -> Result<Option<Document>> {
        let path = self.resolve(key)?;
        let (root, sub) = path.split();
        debug!(root, sub_path = %sub, "get");

        let Some(doc) = self.load(root)? else {
            return Ok(None);
        };
        if sub.is_empty() {
            return Ok(Some(doc));
        }
        Ok(overlay::get(&doc, sub).cloned())
    }

    /// Read the node at `key` into `T` using the current decode policy
    ///
    /// # Errors
    ///
    /// As [`Store::get`]; a node that does not fit `T` is `CorruptData`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.resolve(key)?;
        let (root, sub) = path.split();
        let policy = self.decode_policy();
        debug!(root, sub_path = %sub, %policy, "get_as");

        match self.backend.read(root, root)? {
            Some(bytes) => codec::decode_as(&bytes, sub, policy),
            None => Ok(None),
        }
    }

    /// Write `value` at `key`
    ///
    /// Missing intermediate nodes are created as maps; scalars in the way
    /// are replaced by maps. Through an array, the next free index appends
    /// and any other key turns the array into a map keyed by position.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` for malformed keys
    /// - `LimitExceeded` if the path or resulting record is too large
    /// - `CorruptData` if the stored record does not decode
    /// - `Storage` if the read or upsert fails
    pub fn put(&self, key: &str, value: impl Into<Document>) -> Result<()> {
        let path = self.resolve(key)?;
        let (root, sub) = path.split();
        let value = value.into();
        debug!(root, sub_path = %sub, "put");

        let lock = self.root_lock(root);
        let _guard = lock.as_ref().map(|l| l.lock());

        if sub.is_empty() {
            return self.store(root, &value);
        }

        let current = self.load(root)?.unwrap_or_else(Document::map);
        let merged = overlay::set(current, sub, value);
        self.store(root, &merged)
    }

    /// Append `value` to the array at `key`
    ///
    /// An absent node becomes a one-element array.
    ///
    /// # Errors
    ///
    /// - `NotAnArray` if a non-array node (null included) occupies `key`;
    ///   nothing is written
    /// - otherwise as [`Store::put`]
    pub fn add(&self, key: &str, value: impl Into<Document>) -> Result<()> {
        let path = self.resolve(key)?;
        let (root, sub) = path.split();
        let value = value.into();
        debug!(root, sub_path = %sub, "add");

        let lock = self.root_lock(root);
        let _guard = lock.as_ref().map(|l| l.lock());

        let appended = match self.load(root)? {
            None if sub.is_empty() => Ok(Document::Array(vec![value])),
            current => overlay::append(current.unwrap_or_else(Document::map), sub, value),
        };

        match appended {
            Ok(merged) => self.store(root, &merged),
            Err(AppendRejected { found, .. }) => {
                warn!(key, found, "append rejected: target is not an array");
                Err(Error::NotAnArray {
                    path: path.to_string(),
                    found,
                })
            }
        }
    }

    /// Remove the node at `key`
    ///
    /// A single-segment key deletes the whole record. Deeper keys remove the
    /// node from its parent and rewrite the record, which is kept even if it
    /// ends up empty. Removing something that is not there succeeds.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` for malformed keys
    /// - `CorruptData` if the stored record does not decode
    /// - `Storage` if a backing-store call fails
    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;
        let (root, sub) = path.split();
        debug!(root, sub_path = %sub, "delete");

        let lock = self.root_lock(root);
        let _guard = lock.as_ref().map(|l| l.lock());

        if sub.is_empty() {
            return self.backend.delete_record(root, root);
        }

        let Some(current) = self.load(root)? else {
            return Ok(());
        };
        match overlay::remove(current, sub) {
            Removal::WholeRecord => self.backend.delete_record(root, root),
            Removal::Edited { removed: None, .. } => {
                debug!(root, sub_path = %sub, "nothing to delete");
                Ok(())
            }
            Removal::Edited { root: doc, .. } => self.store(root, &doc),
        }
    }

    // ========================================================================
    // Reserved root partition
    // ========================================================================

    /// Read a whole document stored with [`Store::put_record`]
    pub fn get_record(&self, key: &str) -> Result<Option<Document>> {
        check_record_key(key)?;
        match self.backend.read(ROOT_COLLECTION, key)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Store a whole document under an arbitrary key in [`ROOT_COLLECTION`]
    ///
    /// The key is used verbatim; dots have no meaning here.
    pub fn put_record(&self, key: &str, value: impl Into<Document>) -> Result<()> {
        check_record_key(key)?;
        let value = value.into();
        let bytes = self.encode_checked(&value)?;
        self.backend.upsert(ROOT_COLLECTION, key, &bytes)
    }

    /// Delete a document stored with [`Store::put_record`]
    pub fn delete_record(&self, key: &str) -> Result<()> {
        check_record_key(key)?;
        self.backend.delete_record(ROOT_COLLECTION, key)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn resolve(&self, key: &str) -> Result<KeyPath> {
        let path = KeyPath::parse(key)?;
        self.limits.validate_path_length(path.len())?;
        Ok(path)
    }

    fn root_lock(&self, root: &str) -> Option<Arc<Mutex<()>>> {
        self.root_locks
            .as_ref()
            .map(|locks| locks.entry(root.to_string()).or_default().value().clone())
    }

    fn load(&self, root: &str) -> Result<Option<Document>> {
        match self.backend.read(root, root)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn store(&self, root: &str, doc: &Document) -> Result<()> {
        let bytes = self.encode_checked(doc)?;
        self.backend.upsert(root, root, &bytes)
    }

    fn encode_checked(&self, doc: &Document) -> Result<Vec<u8>> {
        self.limits.validate_depth(doc)?;
        let bytes = codec::encode(doc)?;
        self.limits.validate_size(bytes.len())?;
        Ok(bytes)
    }
}

fn check_record_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_path(key, "empty key"));
    }
    Ok(())
}
