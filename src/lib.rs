//! agreementdb: embedded persistence for agreement records.
//!
//! Agreements live in a single `redb` file. Open a [`Database`] once, share
//! it behind an `Arc`, and hand it to an [`AgreementStore`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use agreementdb::{AgreementStore, Database};
//!
//! # fn main() -> agreementdb::StoreResult<()> {
//! let db = Arc::new(Database::open("/var/lib/agbot/agreements.redb")?);
//! let agreements = AgreementStore::new(db);
//!
//! agreements.attempt_agreement("agr-1", "Basic")?;
//! agreements.mark_agreement_made("agr-1", "{}", "http://verify", false)?;
//! assert!(agreements.find_by_id("agr-1")?.is_some());
//! agreements.delete_agreement("agr-1")?;
//! # Ok(())
//! # }
//! ```

pub mod types;

pub use types::*;

/// Filter factories and the bucket scan they plug into.
pub mod filter {
    pub use agreementdb_primitives::filter::*;
}
