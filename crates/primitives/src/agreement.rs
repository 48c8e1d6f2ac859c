//! Agreement store
//!
//! Stateless facade over [`Database`] for agreement records.
//!
//! # Design
//!
//! AgreementStore holds only an `Arc<Database>` reference. Multiple
//! instances sharing the same Database see the same data, and Clone is
//! cheap (just an Arc clone).
//!
//! All records live in the [`AGREEMENTS_BUCKET`] bucket keyed by agreement
//! id.
//!
//! # Updates
//!
//! Updates are merge-by-whitelist: the caller's transform sees the full
//! record, but only the mutable fields of its result are copied onto the
//! record re-read inside the write transaction (see
//! [`Agreement::merge_mutable`]). The lookup and the write are separate
//! transactions; concurrent updates to the same id are last-writer-wins.
//!
//! # Example
//!
//! ```ignore
//! let db = Arc::new(Database::open(path)?);
//! let agreements = AgreementStore::new(db.clone());
//!
//! agreements.attempt_agreement("agr-1", "Basic")?;
//! agreements.mark_agreement_made("agr-1", proposal, "http://verify", false)?;
//! let agreement = agreements.find_by_id("agr-1")?;
//! ```

use std::sync::Arc;

use redb::ReadableTable;
use tracing::{debug, error, warn};

use agreementdb_core::timestamp::now_secs;
use agreementdb_core::{Agreement, StoreError, StoreResult};
use agreementdb_storage::{bucket, bucket_exists_in, codec, Database};

use crate::filter::{by_id, scan_filtered, Filter};

/// Bucket holding agreement records.
pub const AGREEMENTS_BUCKET: &str = "agreements";

/// Agreement persistence facade.
///
/// # Thread Safety
///
/// AgreementStore is Clone and Send + Sync. Write transactions are
/// serialized by the database; reads run against snapshots.
#[derive(Clone, Debug)]
pub struct AgreementStore {
    db: Arc<Database>,
}

impl AgreementStore {
    /// Create a new agreement store facade
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The shared database handle.
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Persist a new pending agreement.
    ///
    /// Fails with [`StoreError::InvalidArgument`] on an empty id or protocol
    /// and with [`StoreError::DuplicateKey`] if the id is already stored.
    pub fn attempt_agreement(&self, id: &str, protocol: &str) -> StoreResult<()> {
        let agreement = Agreement::new(id, protocol)?;
        self.db
            .create_if_absent(&agreement.id, AGREEMENTS_BUCKET, &agreement)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All agreements accepted by every filter, in id order.
    pub fn find_agreements(&self, filters: &[Filter<Agreement>]) -> StoreResult<Vec<Agreement>> {
        scan_filtered(&self.db, AGREEMENTS_BUCKET, filters)
    }

    /// The agreement with the given id, or `None`.
    ///
    /// More than one match is a broken uniqueness invariant and fails with
    /// [`StoreError::AmbiguousRecord`].
    pub fn find_by_id(&self, id: &str) -> StoreResult<Option<Agreement>> {
        let mut matches = self.find_agreements(&[by_id(id)])?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(StoreError::AmbiguousRecord {
                id: id.to_string(),
                matches,
            }),
        }
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Apply `transform` to the stored agreement and persist its mutable
    /// fields.
    ///
    /// Returns the record as written. Changes the transform makes to `id`,
    /// `protocol` or `inception_time` are discarded.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if no agreement has this id, or it was
    ///   deleted before the write transaction began
    /// - [`StoreError::AmbiguousRecord`] if the lookup matched several records
    /// - [`StoreError::CorruptRecord`] if the stored bytes no longer decode
    pub fn update_agreement<F>(&self, id: &str, transform: F) -> StoreResult<Agreement>
    where
        F: FnOnce(Agreement) -> Agreement,
    {
        let current = self
            .find_by_id(id)?
            .ok_or_else(|| StoreError::not_found(id))?;
        let candidate = transform(current);
        self.persist_mutable_fields(id, &candidate)
    }

    /// Record that the counterparty accepted `proposal`.
    ///
    /// Sets the creation time to now along with the proposal and the data
    /// verification settings.
    pub fn mark_agreement_made(
        &self,
        id: &str,
        proposal: &str,
        url: &str,
        checks: bool,
    ) -> StoreResult<Agreement> {
        self.update_agreement(id, |mut a| {
            a.creation_time = now_secs();
            a.proposal = proposal.to_string();
            a.data_verification_url = url.to_string();
            a.disable_data_verification_checks = checks;
            a
        })
    }

    /// Replace the terms of an existing agreement.
    ///
    /// Same mutation as [`mark_agreement_made`](Self::mark_agreement_made),
    /// for callers renegotiating an agreement that is already in place.
    pub fn update_agreement_terms(
        &self,
        id: &str,
        proposal: &str,
        url: &str,
        checks: bool,
    ) -> StoreResult<Agreement> {
        self.mark_agreement_made(id, proposal, url, checks)
    }

    fn persist_mutable_fields(&self, id: &str, candidate: &Agreement) -> StoreResult<Agreement> {
        self.db.write("update_agreement", |txn| {
            let mut table = txn
                .open_table(bucket(AGREEMENTS_BUCKET))
                .map_err(StoreError::storage)?;

            let current = table
                .get(id)
                .map_err(StoreError::storage)?
                .map(|guard| guard.value().to_vec());
            let Some(current) = current else {
                return Err(StoreError::not_found(id));
            };

            let mut stored: Agreement = codec::decode(id, &current)?;
            stored.merge_mutable(candidate);

            let bytes = codec::encode(&stored)?;
            table
                .insert(id, bytes.as_slice())
                .map_err(StoreError::storage)?;

            debug!(
                bucket = AGREEMENTS_BUCKET,
                key = %id,
                agreement = %stored,
                "Updated agreement"
            );
            Ok(stored)
        })
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Remove the agreement stored under `id`.
    ///
    /// Deleting an id that is not stored logs a warning and succeeds, so
    /// repeated deletes are harmless. A stored record is decoded only to warn
    /// when it still carries an agreement id; if that decode fails the record
    /// is deleted anyway.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] on an empty id
    /// - [`StoreError::UnknownBucket`] if no agreement was ever stored
    pub fn delete_agreement(&self, id: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::invalid_input("missing required arg id"));
        }

        self.db.write("delete_agreement", |txn| {
            if !bucket_exists_in(txn, AGREEMENTS_BUCKET)? {
                return Err(StoreError::unknown_bucket(AGREEMENTS_BUCKET));
            }
            let mut table = txn
                .open_table(bucket(AGREEMENTS_BUCKET))
                .map_err(StoreError::storage)?;

            let existing = table
                .get(id)
                .map_err(StoreError::storage)?
                .map(|guard| guard.value().to_vec());
            let Some(existing) = existing else {
                warn!(key = %id, "Record deletion requested, but record does not exist");
                return Ok(());
            };

            match codec::decode::<Agreement>(id, &existing) {
                Ok(record) if !record.id.is_empty() => {
                    warn!(
                        key = %id,
                        "Deleting an agreement record with an agreement id; it should only be \
                         removed after the agreement is cancelled"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    error!(
                        key = %id,
                        error = %e,
                        "Unable to decode agreement before deletion, deleting anyway"
                    );
                }
            }

            table.remove(id).map_err(StoreError::storage)?;
            debug!(bucket = AGREEMENTS_BUCKET, key = %id, "Deleted agreement");
            Ok(())
        })
    }
}
