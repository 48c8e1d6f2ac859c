//! Public API smoke tests
//!
//! Exercises the facade crate the way an agreement bot would: everything is
//! reached through `agreementdb::*` re-exports.

use std::sync::Arc;

use agreementdb::filter::{by_id, by_protocol};
use agreementdb::{Agreement, AgreementStore, Database, StoreError};
use tempfile::TempDir;

/// Test: the documented end-to-end scenario
#[test]
fn test_agreement_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let db = Arc::new(Database::open(temp_dir.path().join("agbot.redb")).unwrap());
    let agreements = AgreementStore::new(db);

    agreements.attempt_agreement("agr-1", "proto-v1").unwrap();
    let pending = agreements.find_by_id("agr-1").unwrap().unwrap();
    assert_eq!(pending.creation_time, 0);
    assert_eq!(pending.proposal, "");

    agreements
        .mark_agreement_made("agr-1", "new-proposal", "http://verify", false)
        .unwrap();
    let made = agreements.find_by_id("agr-1").unwrap().unwrap();
    assert!(made.creation_time > 0);
    assert_eq!(made.proposal, "new-proposal");
    assert_eq!(made.data_verification_url, "http://verify");
    assert!(!made.disable_data_verification_checks);

    agreements.delete_agreement("agr-1").unwrap();
    assert!(agreements.find_by_id("agr-1").unwrap().is_none());
    agreements.delete_agreement("agr-1").unwrap();
}

/// Test: entity factory and error taxonomy are reachable from the facade
#[test]
fn test_factory_and_errors() {
    assert!(matches!(
        Agreement::new("", "proto"),
        Err(StoreError::InvalidArgument { .. })
    ));

    let temp_dir = TempDir::new().unwrap();
    let db = Arc::new(Database::open(temp_dir.path().join("agbot.redb")).unwrap());
    let agreements = AgreementStore::new(db);

    agreements.attempt_agreement("agr-1", "Basic").unwrap();
    agreements.attempt_agreement("agr-2", "Citizen").unwrap();
    assert!(agreements
        .attempt_agreement("agr-1", "Basic")
        .unwrap_err()
        .is_duplicate_key());

    let basic = agreements
        .find_agreements(&[by_protocol("Basic"), by_id("agr-1")])
        .unwrap();
    assert_eq!(basic.len(), 1);
}
