//! Generic record primitive.
//!
//! Bucket-scoped single-key operations usable for any serializable record
//! type. Higher-level stores build on these instead of touching `redb`
//! tables directly when a single key is all they need.

use redb::ReadableTable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use agreementdb_core::{StoreError, StoreResult};

use crate::codec;
use crate::database::{bucket, open_bucket_read, Database};

impl Database {
    /// Write `record` under `key` in `bucket_name` unless the key is taken.
    ///
    /// The bucket is created if needed. Fails with
    /// [`StoreError::InvalidArgument`] on an empty key or bucket name and
    /// with [`StoreError::DuplicateKey`] if an entry already exists under
    /// `key`; in both cases nothing is written.
    pub fn create_if_absent<R: Serialize + ?Sized>(
        &self,
        key: &str,
        bucket_name: &str,
        record: &R,
    ) -> StoreResult<()> {
        if key.is_empty() || bucket_name.is_empty() {
            return Err(StoreError::invalid_input(
                "missing required args, key and/or bucket",
            ));
        }

        self.write("create_if_absent", |txn| {
            let mut table = txn
                .open_table(bucket(bucket_name))
                .map_err(StoreError::storage)?;

            if table.get(key).map_err(StoreError::storage)?.is_some() {
                return Err(StoreError::duplicate_key(bucket_name, key));
            }

            let bytes = codec::encode(record)?;
            table
                .insert(key, bytes.as_slice())
                .map_err(StoreError::storage)?;

            debug!(bucket = %bucket_name, key = %key, "Wrote new record");
            Ok(())
        })
    }

    /// Point read of the record stored under `key` in `bucket_name`.
    ///
    /// A missing bucket or key is `Ok(None)`; bytes that do not decode as
    /// `R` are [`StoreError::CorruptRecord`].
    pub fn read_record<R: DeserializeOwned>(
        &self,
        bucket_name: &str,
        key: &str,
    ) -> StoreResult<Option<R>> {
        self.read(|txn| {
            let Some(table) = open_bucket_read(txn, bucket_name)? else {
                return Ok(None);
            };
            match table.get(key).map_err(StoreError::storage)? {
                Some(guard) => codec::decode(key, guard.value()).map(Some),
                None => Ok(None),
            }
        })
    }

    /// Whether `bucket_name` has ever been created in this file.
    pub fn bucket_exists(&self, bucket_name: &str) -> StoreResult<bool> {
        self.read(|txn| Ok(open_bucket_read(txn, bucket_name)?.is_some()))
    }
}
