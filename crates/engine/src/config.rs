//! Store configuration via `notnodb.toml`
//!
//! A config file is optional: `Store::open(&StoreConfig::default())` gives a
//! private in-memory SQLite store. `write_default_if_missing` drops a
//! commented template next to the data for later editing.

use notnodb_core::{DecodePolicy, Error, Result};
use notnodb_storage::SqliteConfig;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "notnodb.toml";

/// Store configuration loaded from `notnodb.toml`.
///
/// # Example
///
/// ```toml
/// decode_policy = "as_map"
/// lock_roots = false
///
/// [sqlite]
/// path = "data/notnodb.sqlite"
/// table_prefix = "notnodb_"
/// synchronous = "normal"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// How typed reads materialize stored maps
    #[serde(default)]
    pub decode_policy: DecodePolicy,
    /// Serialize every write per root inside this process
    #[serde(default)]
    pub lock_roots: bool,
    /// SQLite backing store settings
    #[serde(default)]
    pub sqlite: SqliteConfig,
}

impl StoreConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# NotNoDb store configuration
#
# How typed reads (get_as) materialize stored maps:
#   "as_map"    = decode to the document tree first, then convert (default)
#   "as_struct" = decode straight into the requested type
decode_policy = "as_map"

# Serialize put/add/delete per root segment inside this process (default: false).
# Without it, concurrent writes under the same root may lose updates.
lock_roots = false

[sqlite]
# Database file. Comment out for a private in-memory database.
# path = "notnodb.sqlite"

# Every collection lives in a table named <table_prefix><root segment>.
table_prefix = "notnodb_"

# Use write-ahead logging for file-backed databases (default: true)
wal_mode = true

# "full", "normal" (default) or "off"
synchronous = "normal"

# Milliseconds a writer waits on a locked database before failing
busy_timeout_ms = 5000
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text does not parse or a value is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming `path` if the file cannot be read,
    /// parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| file_error("read", path, e))?;
        Self::from_toml_str(&content).map_err(|e| file_error("load", path, e))
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<()> {
        self.sqlite.validate()
    }

    /// Create `path` holding [`StoreConfig::default_toml`] unless it exists.
    ///
    /// An existing file is left untouched.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        let created = OpenOptions::new().write(true).create_new(true).open(path);
        match created {
            Ok(mut file) => file
                .write_all(Self::default_toml().as_bytes())
                .map_err(|e| file_error("write", path, e)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(file_error("create", path, e)),
        }
    }

    /// Write this config to `path` as TOML, replacing any existing file.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(Error::config)?;
        std::fs::write(path, content).map_err(|e| file_error("write", path, e))
    }
}

fn file_error(action: &str, path: &Path, cause: impl std::fmt::Display) -> Error {
    Error::config(format!(
        "cannot {} config file '{}': {}",
        action,
        path.display(),
        cause
    ))
}
