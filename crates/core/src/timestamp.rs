//! Unix-second timestamps.
//!
//! Agreement times are persisted as whole seconds since the epoch.

use chrono::Utc;

/// Current unix time in seconds.
///
/// Clamps to 0 for clocks set before the epoch.
pub fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
