//! Primitives layer for agreementdb
//!
//! This crate implements the record stores built on the storage layer:
//! - Filter engine: predicate scans over a whole bucket
//! - Agreement store: create, query, merge-update and delete agreements
//!
//! All primitives are stateless facades over the Database handle.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod agreement;
pub mod filter;

// Re-exports
pub use agreement::{AgreementStore, AGREEMENTS_BUCKET};
pub use filter::{by_id, by_protocol, made, matches_all, scan_filtered, unmade, Filter};
