//! Storage layer for agreementdb
//!
//! Wraps a single `redb` file behind [`Database`]:
//! - Buckets are named `redb` tables keyed by UTF-8 strings with byte values
//! - Writes run through [`Database::write`], one serialized write transaction
//!   at a time; reads through [`Database::read`] see a point-in-time snapshot
//! - [`Database::create_if_absent`] is the generic "insert unless present"
//!   record primitive used by every higher-level store
//!
//! Records are encoded as JSON by [`codec`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod database;
mod record;

pub use config::{AccessMode, DurabilityMode, StoreConfig};
pub use database::{bucket, bucket_exists_in, open_bucket_read, Bucket, Database};
