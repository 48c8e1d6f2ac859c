//! Database configuration.
//!
//! A [`StoreConfig`] can be built in code or loaded from a TOML file:
//!
//! ```toml
//! path = "/var/lib/agbot/agreements.redb"
//! durability = "eventual"
//! cache_size_bytes = 16777216
//! access_mode = "read_write"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use agreementdb_core::{StoreError, StoreResult};

/// How hard a committed write transaction is pushed to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurabilityMode {
    /// fsync on every commit (default).
    #[default]
    Immediate,
    /// Commit is durable once a later `Immediate` commit lands.
    Eventual,
    /// Never fsync. Tests and scratch databases only.
    None,
}

impl From<DurabilityMode> for redb::Durability {
    fn from(mode: DurabilityMode) -> Self {
        match mode {
            DurabilityMode::Immediate => redb::Durability::Immediate,
            DurabilityMode::Eventual => redb::Durability::Eventual,
            DurabilityMode::None => redb::Durability::None,
        }
    }
}

/// Controls whether the database allows writes or is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Allow both reads and writes (default).
    #[default]
    ReadWrite,
    /// Read-only mode: every write operation returns an error.
    ReadOnly,
}

/// Options for opening a database file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the database file. Parent directories are created on open.
    pub path: PathBuf,
    /// Durability applied to every write transaction.
    #[serde(default)]
    pub durability: DurabilityMode,
    /// Page cache size handed to `redb`; its default when unset.
    #[serde(default)]
    pub cache_size_bytes: Option<usize>,
    /// Whether writes are permitted.
    #[serde(default)]
    pub access_mode: AccessMode,
}

impl StoreConfig {
    /// Default configuration for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: DurabilityMode::default(),
            cache_size_bytes: None,
            access_mode: AccessMode::default(),
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(StoreError::config)
    }

    /// Set the durability mode.
    pub fn durability(mut self, mode: DurabilityMode) -> Self {
        self.durability = mode;
        self
    }

    /// Set the page cache size in bytes.
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size_bytes = Some(bytes);
        self
    }

    /// Set the access mode.
    pub fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    /// Whether this configuration permits writes.
    pub fn is_read_only(&self) -> bool {
        self.access_mode == AccessMode::ReadOnly
    }
}
