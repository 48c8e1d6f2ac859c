//! The database handle.
//!
//! One [`Database`] owns one `redb` file. Open it once at startup, share it
//! as `Arc<Database>`, and let the file close when the last reference drops.
//!
//! # Transactions
//!
//! - [`Database::write`]: one write transaction. `redb` admits a single
//!   writer at a time. The closure's `Ok` commits; its `Err` aborts every
//!   mutation made inside it.
//! - [`Database::read`]: one read-only snapshot. Any number may run
//!   concurrently with each other and with the writer.

use std::path::Path;

use redb::{
    Builder, ReadOnlyTable, ReadTransaction, TableDefinition, TableError, TableHandle,
    WriteTransaction,
};
use tracing::{info, warn};

use agreementdb_core::{StoreError, StoreResult};

use crate::config::StoreConfig;

/// A bucket: a named `redb` table of UTF-8 keys to encoded records.
pub type Bucket<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

/// Table definition for the bucket called `name`.
pub fn bucket(name: &str) -> Bucket<'_> {
    TableDefinition::new(name)
}

/// Handle to an open database file.
pub struct Database {
    inner: redb::Database,
    config: StoreConfig,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open (creating if needed) the database file at `path` with default
    /// settings.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(StoreConfig::new(path.as_ref()))
    }

    /// Open a database described by `config`.
    ///
    /// Read-write handles create the file (and its parent directories) when
    /// missing. Read-only handles require the file to exist.
    pub fn open_with_config(config: StoreConfig) -> StoreResult<Self> {
        let mut builder = Builder::new();
        if let Some(bytes) = config.cache_size_bytes {
            builder.set_cache_size(bytes);
        }

        let inner = if config.is_read_only() {
            builder.open(&config.path).map_err(StoreError::storage)?
        } else {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(StoreError::storage)?;
                }
            }
            builder.create(&config.path).map_err(StoreError::storage)?
        };

        info!(
            path = %config.path.display(),
            durability = ?config.durability,
            access_mode = ?config.access_mode,
            "Opened database"
        );
        Ok(Self { inner, config })
    }

    /// The configuration this handle was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Whether writes are rejected.
    pub fn is_read_only(&self) -> bool {
        self.config.is_read_only()
    }

    /// Run `f` inside a single write transaction.
    ///
    /// `operation` names the caller in the [`StoreError::ReadOnly`] error
    /// returned by read-only handles.
    pub fn write<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&WriteTransaction) -> StoreResult<T>,
    ) -> StoreResult<T> {
        if self.is_read_only() {
            return Err(StoreError::ReadOnly { operation });
        }

        let mut txn = self.inner.begin_write().map_err(StoreError::storage)?;
        txn.set_durability(self.config.durability.into());

        match f(&txn) {
            Ok(value) => {
                txn.commit().map_err(StoreError::storage)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    warn!(operation, error = %abort_err, "Failed to abort write transaction");
                }
                Err(e)
            }
        }
    }

    /// Run `f` against a read-only snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&ReadTransaction) -> StoreResult<T>) -> StoreResult<T> {
        let txn = self.inner.begin_read().map_err(StoreError::storage)?;
        f(&txn)
    }
}

/// Open `name` for reading, or `None` if the bucket was never created.
pub fn open_bucket_read(
    txn: &ReadTransaction,
    name: &str,
) -> StoreResult<Option<ReadOnlyTable<&'static str, &'static [u8]>>> {
    match txn.open_table(bucket(name)) {
        Ok(table) => Ok(Some(table)),
        Err(TableError::TableDoesNotExist(_)) => Ok(None),
        Err(e) => Err(StoreError::storage(e)),
    }
}

/// Whether the bucket `name` exists, as seen by a write transaction.
pub fn bucket_exists_in(txn: &WriteTransaction, name: &str) -> StoreResult<bool> {
    let mut tables = txn.list_tables().map_err(StoreError::storage)?;
    Ok(tables.any(|handle| handle.name() == name))
}
