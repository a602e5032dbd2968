//! SQLite backing store
//!
//! One table per collection, named `<table_prefix><collection>`:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS "notnodb_users" (
//!     key   TEXT PRIMARY KEY NOT NULL,
//!     value BLOB NOT NULL
//! )
//! ```
//!
//! Writes are single `INSERT ... ON CONFLICT(key) DO UPDATE` statements, so
//! two writers racing on the same key never leave duplicate rows. Only
//! `upsert` and `ensure_collection` create tables, with `IF NOT EXISTS`,
//! memoized per instance. Reads and deletes against a missing table touch
//! nothing.

use dashmap::DashSet;
use notnodb_core::{BackingStore, Error, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SqliteConfig;

fn storage_err(e: rusqlite::Error) -> Error {
    Error::storage(e)
}

/// [`BackingStore`] over a single SQLite connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
    table_prefix: String,
    /// Collections known to exist
    created: DashSet<String>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("table_prefix", &self.table_prefix)
            .field("created", &self.created.len())
            .finish()
    }
}

impl SqliteStore {
    /// Open (or create) the database described by `config`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` is invalid and `Error::Storage`
    /// if the database cannot be opened or configured.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        config.validate()?;

        let conn = match &config.path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_WRITE
                        | OpenFlags::SQLITE_OPEN_CREATE
                        | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
                .map_err(storage_err)?
            }
            None => Connection::open_in_memory().map_err(storage_err)?,
        };

        Self::configure_connection(&conn, config)?;

        info!(
            path = ?config.path,
            table_prefix = %config.table_prefix,
            "opened sqlite store"
        );

        Ok(Self {
            conn: Mutex::new(conn),
            table_prefix: config.table_prefix.clone(),
            created: DashSet::new(),
        })
    }

    /// Private in-memory database with default settings
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&SqliteConfig::default())
    }

    fn configure_connection(conn: &Connection, config: &SqliteConfig) -> Result<()> {
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(storage_err)?;

        // in-memory databases report "memory" and ignore WAL
        if config.wal_mode && config.path.is_some() {
            let mode: String = conn
                .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                .map_err(storage_err)?;
            debug!(journal_mode = %mode, "journal mode set");
        }

        conn.pragma_update(None, "synchronous", config.synchronous.as_pragma())
            .map_err(storage_err)?;

        Ok(())
    }

    /// Table prefix in use
    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// Unquoted table name backing `collection`
    pub fn table_name(&self, collection: &str) -> String {
        format!("{}{}", self.table_prefix, collection)
    }

    fn quoted_table(&self, collection: &str) -> String {
        format!("\"{}\"", self.table_name(collection).replace('"', "\"\""))
    }

    /// Whether the table backing `collection` exists
    ///
    /// Checks the memo first, then `sqlite_master`, so a table created by
    /// another connection to the same file is found too.
    pub fn collection_exists(&self, collection: &str) -> Result<bool> {
        if self.created.contains(collection) {
            return Ok(true);
        }
        let found = {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare_cached(
                    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                )
                .map_err(storage_err)?;
            stmt.exists(params![self.table_name(collection)])
                .map_err(storage_err)?
        };
        if found {
            self.created.insert(collection.to_string());
        }
        Ok(found)
    }

    /// Run `f` against the underlying connection
    ///
    /// Holds the connection lock for the duration of `f`.
    pub fn with_connection<R>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<R>,
    ) -> Result<R> {
        let conn = self.conn.lock();
        f(&conn).map_err(storage_err)
    }
}

impl BackingStore for SqliteStore {
    fn ensure_collection(&self, name: &str) -> Result<()> {
        if self.created.contains(name) {
            return Ok(());
        }

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    key TEXT PRIMARY KEY NOT NULL,\n    value BLOB NOT NULL\n)",
            self.quoted_table(name)
        );
        {
            let conn = self.conn.lock();
            conn.execute(&sql, []).map_err(storage_err)?;
        }

        if self.created.insert(name.to_string()) {
            debug!(collection = name, table = %self.table_name(name), "ensured collection");
        }
        Ok(())
    }

    fn read(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        if !self.collection_exists(collection)? {
            return Ok(None);
        }
        let sql = format!(
            "SELECT \"value\" FROM {} WHERE \"key\" = ?1",
            self.quoted_table(collection)
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&sql).map_err(storage_err)?;
        stmt.query_row(params![key], |row| row.get::<_, Vec<u8>>(0))
            .optional()
            .map_err(storage_err)
    }

    fn upsert(&self, collection: &str, key: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_collection(collection)?;
        let sql = format!(
            "INSERT INTO {} (\"key\", \"value\") VALUES (?1, ?2) \
             ON CONFLICT(\"key\") DO UPDATE SET \"value\" = excluded.\"value\"",
            self.quoted_table(collection)
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&sql).map_err(storage_err)?;
        stmt.execute(params![key, bytes]).map_err(storage_err)?;
        Ok(())
    }

    fn delete_record(&self, collection: &str, key: &str) -> Result<()> {
        if !self.collection_exists(collection)? {
            return Ok(());
        }
        let sql = format!(
            "DELETE FROM {} WHERE \"key\" = ?1",
            self.quoted_table(collection)
        );
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&sql).map_err(storage_err)?;
        stmt.execute(params![key]).map_err(storage_err)?;
        Ok(())
    }
}
