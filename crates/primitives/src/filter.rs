//! Filter engine
//!
//! A [`Filter`] is a predicate over a decoded record. [`scan_filtered`] walks
//! a whole bucket in key order and keeps the records every filter accepts.
//!
//! # Semantics
//!
//! - Filters combine with AND: one rejecting filter excludes the record
//! - An empty filter list keeps every record
//! - Records that fail to decode are logged and skipped, the scan goes on
//! - A bucket that was never created scans as empty

use redb::ReadableTable;
use serde::de::DeserializeOwned;
use tracing::{error, trace};

use agreementdb_core::{Agreement, StoreError, StoreResult};
use agreementdb_storage::{codec, open_bucket_read, Database};

/// Predicate deciding whether a decoded record is included in a scan.
pub type Filter<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// True when every filter accepts `record`.
pub fn matches_all<R>(record: &R, filters: &[Filter<R>]) -> bool {
    filters.iter().all(|f| f(record))
}

/// Scan `bucket_name` and return the records that pass all `filters`.
///
/// Runs in one read-only transaction, so the result is a consistent
/// snapshot. Order is the store's key order.
pub fn scan_filtered<R: DeserializeOwned>(
    db: &Database,
    bucket_name: &str,
    filters: &[Filter<R>],
) -> StoreResult<Vec<R>> {
    db.read(|txn| {
        let Some(table) = open_bucket_read(txn, bucket_name)? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for entry in table.iter().map_err(StoreError::storage)? {
            let (key, value) = entry.map_err(StoreError::storage)?;
            let key = key.value();
            match codec::decode::<R>(key, value.value()) {
                Ok(record) => {
                    trace!(bucket = %bucket_name, key = %key, "Decoded record");
                    if matches_all(&record, filters) {
                        records.push(record);
                    }
                }
                Err(e) => {
                    error!(
                        bucket = %bucket_name,
                        key = %key,
                        error = %e,
                        "Unable to decode record, skipping"
                    );
                }
            }
        }
        Ok(records)
    })
}

// =============================================================================
// Agreement filters
// =============================================================================

/// Matches the agreement whose id is `id`.
pub fn by_id(id: impl Into<String>) -> Filter<Agreement> {
    let id = id.into();
    Box::new(move |a: &Agreement| a.id == id)
}

/// Matches agreements negotiated under `protocol`.
pub fn by_protocol(protocol: impl Into<String>) -> Filter<Agreement> {
    let protocol = protocol.into();
    Box::new(move |a: &Agreement| a.protocol == protocol)
}

/// Matches agreements the counterparty has accepted.
pub fn made() -> Filter<Agreement> {
    Box::new(|a: &Agreement| a.is_made())
}

/// Matches agreements still awaiting acceptance.
pub fn unmade() -> Filter<Agreement> {
    Box::new(|a: &Agreement| !a.is_made())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agreementdb_storage::{bucket, DurabilityMode, StoreConfig};
    use tempfile::TempDir;

    const BUCKET: &str = "agreements";

    fn setup_db() -> (TempDir, Database) {
        let temp_dir = TempDir::new().unwrap();
        let config = StoreConfig::new(temp_dir.path().join("filter.redb"))
            .durability(DurabilityMode::None);
        (temp_dir, Database::open_with_config(config).unwrap())
    }

    fn put(db: &Database, id: &str, protocol: &str) {
        let a = Agreement::new(id, protocol).unwrap();
        db.create_if_absent(id, BUCKET, &a).unwrap();
    }

    fn put_raw(db: &Database, key: &str, bytes: &[u8]) {
        db.write("put_raw", |txn| {
            let mut table = txn.open_table(bucket(BUCKET)).map_err(StoreError::storage)?;
            table.insert(key, bytes).map_err(StoreError::storage)?;
            Ok(())
        })
        .unwrap();
    }

    fn ids(records: &[Agreement]) -> Vec<&str> {
        records.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_missing_bucket_scans_empty() {
        let (_dir, db) = setup_db();
        let found = scan_filtered::<Agreement>(&db, BUCKET, &[]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_no_filters_returns_all_in_key_order() {
        let (_dir, db) = setup_db();
        put(&db, "c", "p");
        put(&db, "a", "p");
        put(&db, "b", "p");

        let found = scan_filtered::<Agreement>(&db, BUCKET, &[]).unwrap();
        assert_eq!(ids(&found), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_by_id_selects_one() {
        let (_dir, db) = setup_db();
        put(&db, "a", "p");
        put(&db, "b", "p");

        let found = scan_filtered(&db, BUCKET, &[by_id("b")]).unwrap();
        assert_eq!(ids(&found), vec!["b"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let (_dir, db) = setup_db();
        put(&db, "a", "p");
        put(&db, "b", "p");

        let always_false: Filter<Agreement> = Box::new(|_: &Agreement| false);
        let found = scan_filtered(&db, BUCKET, &[by_id("a"), always_false]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_two_accepting_filters_keep_record() {
        let (_dir, db) = setup_db();
        put(&db, "a", "basic");
        put(&db, "b", "citizen");

        let found = scan_filtered(&db, BUCKET, &[by_id("a"), by_protocol("basic")]).unwrap();
        assert_eq!(ids(&found), vec!["a"]);

        let found = scan_filtered(&db, BUCKET, &[by_id("a"), by_protocol("citizen")]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_undecodable_record_is_skipped() {
        let (_dir, db) = setup_db();
        put(&db, "a", "p");
        put_raw(&db, "b", b"{not json");
        put(&db, "c", "p");

        let found = scan_filtered::<Agreement>(&db, BUCKET, &[]).unwrap();
        assert_eq!(ids(&found), vec!["a", "c"]);
    }

    #[test]
    fn test_made_and_unmade() {
        let (_dir, db) = setup_db();
        put(&db, "pending", "p");
        let mut done = Agreement::new("done", "p").unwrap();
        done.creation_time = 1_700_000_000;
        db.create_if_absent("done", BUCKET, &done).unwrap();

        let found = scan_filtered(&db, BUCKET, &[made()]).unwrap();
        assert_eq!(ids(&found), vec!["done"]);

        let found = scan_filtered(&db, BUCKET, &[unmade()]).unwrap();
        assert_eq!(ids(&found), vec!["pending"]);
    }

    #[test]
    fn test_matches_all_empty_is_true() {
        let a = Agreement::new("a", "p").unwrap();
        assert!(matches_all(&a, &[]));
        assert!(!matches_all(&a, &[by_id("a"), by_id("b")]));
    }
}
