//! Public types for the agreementdb API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Entity and errors
// ============================================================================

pub use agreementdb_core::Agreement;
pub use agreementdb_core::{StoreError, StoreResult};

// ============================================================================
// Storage handle and configuration
// ============================================================================

pub use agreementdb_storage::Database;
pub use agreementdb_storage::{AccessMode, DurabilityMode, StoreConfig};

// ============================================================================
// Stores
// ============================================================================

pub use agreementdb_primitives::{AgreementStore, Filter, AGREEMENTS_BUCKET};
