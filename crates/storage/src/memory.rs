//! In-process backing store
//!
//! Two-level DashMap: collection name -> (key -> record bytes).
//! Reads never block writers to other collections; writes only lock the
//! target shard. Nothing survives the process.

use dashmap::DashMap;
use notnodb_core::{BackingStore, Result};
use tracing::debug;

/// Records of one collection
type Collection = DashMap<String, Vec<u8>>;

/// [`BackingStore`] kept entirely in memory
///
/// Used by tests and by `Store::in_memory`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, Collection>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` has been created
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Number of collections created so far
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Number of records in `collection` (0 if it does not exist)
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Whether `collection` holds no records
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl BackingStore for MemoryStore {
    fn ensure_collection(&self, name: &str) -> Result<()> {
        if !self.collections.contains_key(name) {
            // entry() serializes racing creators on the shard
            self.collections.entry(name.to_string()).or_insert_with(|| {
                debug!(collection = name, "created collection");
                Collection::new()
            });
        }
        Ok(())
    }

    fn read(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(key).map(|v| v.value().clone())))
    }

    fn upsert(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_collection(collection)?;
        if let Some(c) = self.collections.get(collection) {
            c.insert(key.to_string(), bytes.to_vec());
        }
        Ok(())
    }

    fn delete_record(&self, collection: &str, key: &str) -> Result<()> {
        if let Some(c) = self.collections.get(collection) {
            c.remove(key);
        }
        Ok(())
    }
}
