//! Core types for agreementdb
//!
//! This crate defines the pieces every other layer shares:
//! - [`Agreement`]: the persisted entity and its field mutability contract
//! - [`StoreError`] / [`StoreResult`]: the error taxonomy of the store
//! - [`timestamp`]: unix-second clock helpers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agreement;
pub mod error;
pub mod timestamp;

pub use agreement::Agreement;
pub use error::{StoreError, StoreResult};
