//! Error taxonomy for the store.
//!
//! Every fallible operation in the workspace returns [`StoreResult`]. Lower
//! layers map foreign errors (`redb`, `serde_json`, `toml`) into one of these
//! variants at the call site with the constructor helpers below.

use thiserror::Error;

use crate::agreement::Agreement;

/// Result alias used across the workspace.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required input was empty or otherwise unusable.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// A create collided with an existing key.
    #[error("bucket {bucket} already contains record with primary key: {key}")]
    DuplicateKey {
        /// Bucket the write targeted.
        bucket: String,
        /// Key that already exists.
        key: String,
    },

    /// The target of an update was absent when presence was required.
    #[error("no record with key: {key}")]
    NotFound {
        /// Key that was looked up.
        key: String,
    },

    /// More than one stored record matched an id that must be unique.
    #[error("expected only one record for id {id}, but retrieved {}", .matches.len())]
    AmbiguousRecord {
        /// The id that was queried.
        id: String,
        /// Every record that matched.
        matches: Vec<Agreement>,
    },

    /// Stored bytes could not be decoded.
    #[error("corrupt record under key {key}: {reason}")]
    CorruptRecord {
        /// Key of the undecodable entry.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// A delete targeted a bucket that was never created.
    #[error("unknown bucket: {bucket}")]
    UnknownBucket {
        /// Name of the missing bucket.
        bucket: String,
    },

    /// A record could not be encoded.
    #[error("serialization failed: {reason}")]
    Serialization {
        /// Encoder message.
        reason: String,
    },

    /// The underlying key-value store failed.
    #[error("storage error: {reason}")]
    Storage {
        /// Message from the storage engine.
        reason: String,
    },

    /// A write was attempted through a read-only handle.
    #[error("database is read-only, rejected operation: {operation}")]
    ReadOnly {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {reason}")]
    Config {
        /// What went wrong.
        reason: String,
    },
}

impl StoreError {
    /// Build an [`StoreError::InvalidArgument`].
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Build a [`StoreError::DuplicateKey`].
    pub fn duplicate_key(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Build a [`StoreError::NotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Build a [`StoreError::CorruptRecord`].
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::CorruptRecord {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`StoreError::UnknownBucket`].
    pub fn unknown_bucket(bucket: impl Into<String>) -> Self {
        Self::UnknownBucket {
            bucket: bucket.into(),
        }
    }

    /// Build a [`StoreError::Serialization`].
    pub fn serialization(reason: impl ToString) -> Self {
        Self::Serialization {
            reason: reason.to_string(),
        }
    }

    /// Build a [`StoreError::Storage`] from any storage-engine error.
    pub fn storage(err: impl ToString) -> Self {
        Self::Storage {
            reason: err.to_string(),
        }
    }

    /// Build a [`StoreError::Config`].
    pub fn config(reason: impl ToString) -> Self {
        Self::Config {
            reason: reason.to_string(),
        }
    }

    /// True for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for [`StoreError::DuplicateKey`].
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message_names_bucket_and_key() {
        let err = StoreError::duplicate_key("agreements", "agr-1");
        let msg = err.to_string();
        assert!(msg.contains("agreements"));
        assert!(msg.contains("agr-1"));
        assert!(err.is_duplicate_key());
    }

    #[test]
    fn test_ambiguous_message_reports_match_count() {
        let a = Agreement::new("dup", "proto").unwrap();
        let err = StoreError::AmbiguousRecord {
            id: "dup".into(),
            matches: vec![a.clone(), a],
        };
        assert_eq!(
            err.to_string(),
            "expected only one record for id dup, but retrieved 2"
        );
    }

    #[test]
    fn test_storage_wraps_foreign_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = StoreError::storage(io);
        assert!(matches!(err, StoreError::Storage { ref reason } if reason == "disk gone"));
    }

    #[test]
    fn test_not_found_predicate() {
        assert!(StoreError::not_found("x").is_not_found());
        assert!(!StoreError::invalid_input("x").is_not_found());
    }
}
