//! SQLite adapter configuration
//!
//! Loaded as the `[sqlite]` section of `notnodb.toml` (see
//! `notnodb_engine::StoreConfig`), or built directly in code.

use notnodb_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SQLite `synchronous` pragma setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynchronousMode {
    /// Sync at every critical moment
    Full,
    /// Sync at checkpoints only (safe with WAL)
    #[default]
    Normal,
    /// Leave syncing to the OS
    Off,
}

impl SynchronousMode {
    /// Pragma value
    pub fn as_pragma(&self) -> &'static str {
        match self {
            SynchronousMode::Full => "FULL",
            SynchronousMode::Normal => "NORMAL",
            SynchronousMode::Off => "OFF",
        }
    }
}

/// Settings for [`crate::SqliteStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Database file. `None` opens a private in-memory database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Prefix of every collection table name
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
    /// Switch the journal to WAL mode on open
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
    /// `synchronous` pragma
    #[serde(default)]
    pub synchronous: SynchronousMode,
    /// How long a writer waits on a locked database before failing
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// Default table prefix
pub const DEFAULT_TABLE_PREFIX: &str = "notnodb_";

fn default_table_prefix() -> String {
    DEFAULT_TABLE_PREFIX.to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: None,
            table_prefix: default_table_prefix(),
            wal_mode: default_wal_mode(),
            synchronous: SynchronousMode::default(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl SqliteConfig {
    /// File-backed configuration with defaults for everything else
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Check values serde cannot check
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the table prefix is empty, contains a NUL
    /// byte, or starts with SQLite's reserved `sqlite_` prefix.
    pub fn validate(&self) -> Result<()> {
        if self.table_prefix.is_empty() {
            return Err(Error::config("table_prefix must not be empty"));
        }
        if self.table_prefix.contains('\0') {
            return Err(Error::config("table_prefix must not contain NUL"));
        }
        if self.table_prefix.to_ascii_lowercase().starts_with("sqlite_") {
            return Err(Error::config(format!(
                "table_prefix '{}' uses the reserved sqlite_ prefix",
                self.table_prefix
            )));
        }
        Ok(())
    }
}
