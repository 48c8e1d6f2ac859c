//! The Agreement entity.
//!
//! One record per negotiated agreement between two parties. Field names on
//! disk are fixed (see the `serde(rename)` attributes) so records written by
//! earlier releases keep decoding.
//!
//! # Mutability
//!
//! | Field | Mutable |
//! |-------|---------|
//! | `id` | no |
//! | `protocol` | no |
//! | `inception_time` | no |
//! | `creation_time` | yes |
//! | `proposal` | yes |
//! | `data_verification_url` | yes |
//! | `disable_data_verification_checks` | yes |
//!
//! Only [`Agreement::merge_mutable`] decides which fields an update may touch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::timestamp::now_secs;

/// A persisted agreement record.
///
/// Missing fields decode to their zero values, so records that predate a
/// field (e.g. `data_verification_URL`) still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agreement {
    /// Unique primary key.
    #[serde(rename = "current_agreement_id")]
    pub id: String,
    /// Agreement protocol name.
    #[serde(rename = "agreement_protocol")]
    pub protocol: String,
    /// Unix seconds at construction.
    #[serde(rename = "agreement_inception_time")]
    pub inception_time: u64,
    /// Unix seconds at which the counterparty accepted; 0 until then.
    #[serde(rename = "agreement_creation_time")]
    pub creation_time: u64,
    /// Opaque serialized proposal.
    pub proposal: String,
    /// URL used to check that the agreement is producing data.
    #[serde(rename = "data_verification_URL")]
    pub data_verification_url: String,
    /// Skip data verification and assume data is flowing.
    pub disable_data_verification_checks: bool,
}

impl Agreement {
    /// Construct a pending agreement.
    ///
    /// Fails with [`StoreError::InvalidArgument`] if `id` or `protocol` is
    /// empty. Does not touch the store.
    pub fn new(id: impl Into<String>, protocol: impl Into<String>) -> StoreResult<Self> {
        let id = id.into();
        let protocol = protocol.into();
        if id.is_empty() || protocol.is_empty() {
            return Err(StoreError::invalid_input(
                "agreement id or agreement protocol is empty",
            ));
        }
        Ok(Self {
            id,
            protocol,
            inception_time: now_secs(),
            ..Self::default()
        })
    }

    /// Whether the counterparty has accepted the proposal.
    pub fn is_made(&self) -> bool {
        self.creation_time != 0
    }

    /// Copy the mutable fields of `candidate` onto `self`.
    ///
    /// `id`, `protocol` and `inception_time` are left as they are, whatever
    /// the candidate holds.
    pub fn merge_mutable(&mut self, candidate: &Agreement) {
        self.creation_time = candidate.creation_time;
        self.proposal.clone_from(&candidate.proposal);
        self.data_verification_url
            .clone_from(&candidate.data_verification_url);
        self.disable_data_verification_checks = candidate.disable_data_verification_checks;
    }
}

impl fmt::Display for Agreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id: {}, protocol: {}, inception_time: {}, creation_time: {}, proposal: {}, \
             data_verification_url: {}, disable_data_verification_checks: {}",
            self.id,
            self.protocol,
            self.inception_time,
            self.creation_time,
            self.proposal,
            self.data_verification_url,
            self.disable_data_verification_checks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_defaults() {
        let a = Agreement::new("agr-1", "proto-v1").unwrap();
        assert_eq!(a.id, "agr-1");
        assert_eq!(a.protocol, "proto-v1");
        assert!(a.inception_time > 0);
        assert_eq!(a.creation_time, 0);
        assert_eq!(a.proposal, "");
        assert_eq!(a.data_verification_url, "");
        assert!(!a.disable_data_verification_checks);
        assert!(!a.is_made());
    }

    #[test]
    fn test_new_rejects_empty_id() {
        let err = Agreement::new("", "proto").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument { .. }));
    }

    #[test]
    fn test_new_rejects_empty_protocol() {
        let err = Agreement::new("agr-1", "").unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument { .. }));
    }

    #[test]
    fn test_merge_mutable_ignores_identity_fields() {
        let mut stored = Agreement::new("agr-1", "proto-v1").unwrap();
        let inception = stored.inception_time;

        let candidate = Agreement {
            id: "hijacked".into(),
            protocol: "other".into(),
            inception_time: 1,
            creation_time: 42,
            proposal: "p".into(),
            data_verification_url: "http://verify".into(),
            disable_data_verification_checks: true,
        };
        stored.merge_mutable(&candidate);

        assert_eq!(stored.id, "agr-1");
        assert_eq!(stored.protocol, "proto-v1");
        assert_eq!(stored.inception_time, inception);
        assert_eq!(stored.creation_time, 42);
        assert_eq!(stored.proposal, "p");
        assert_eq!(stored.data_verification_url, "http://verify");
        assert!(stored.disable_data_verification_checks);
    }

    #[test]
    fn test_json_uses_persisted_field_names() {
        let a = Agreement::new("agr-1", "proto-v1").unwrap();
        let json = serde_json::to_value(&a).unwrap();
        let obj = json.as_object().unwrap();
        for name in [
            "current_agreement_id",
            "agreement_protocol",
            "agreement_inception_time",
            "agreement_creation_time",
            "proposal",
            "data_verification_URL",
            "disable_data_verification_checks",
        ] {
            assert!(obj.contains_key(name), "missing {name}");
        }
        assert_eq!(obj.len(), 7);
    }

    #[test]
    fn test_decodes_record_without_newer_fields() {
        let old = r#"{
            "current_agreement_id": "agr-old",
            "agreement_protocol": "proto-v0",
            "agreement_inception_time": 1500000000,
            "agreement_creation_time": 1500000100,
            "proposal": "{}"
        }"#;
        let a: Agreement = serde_json::from_str(old).unwrap();
        assert_eq!(a.id, "agr-old");
        assert_eq!(a.creation_time, 1_500_000_100);
        assert_eq!(a.data_verification_url, "");
        assert!(!a.disable_data_verification_checks);
    }

    #[test]
    fn test_display_mentions_id() {
        let a = Agreement::new("agr-1", "proto-v1").unwrap();
        assert!(a.to_string().starts_with("id: agr-1, protocol: proto-v1"));
    }
}
