//! Record encoding.
//!
//! Values are stored as JSON so the on-disk field names stay readable and
//! stable across releases.

use serde::de::DeserializeOwned;
use serde::Serialize;

use agreementdb_core::{StoreError, StoreResult};

/// Encode a record for storage.
pub fn encode<R: Serialize + ?Sized>(record: &R) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(StoreError::serialization)
}

/// Decode a stored record. `key` is only used to label the error.
pub fn decode<R: DeserializeOwned>(key: &str, bytes: &[u8]) -> StoreResult<R> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::corrupt(key, e))
}
