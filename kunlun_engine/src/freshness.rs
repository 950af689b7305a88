//! Online/offline decision by snapshot age.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds without a new snapshot after which a host counts as offline.
pub const DEFAULT_STALE_SECS: i64 = 60;

/// `true` once `now - timestamp` exceeds the threshold; exactly at the
/// threshold the host is still online.
pub fn is_stale(timestamp: i64, now: i64) -> bool {
    is_stale_after(timestamp, now, DEFAULT_STALE_SECS)
}

pub fn is_stale_after(timestamp: i64, now: i64, threshold_secs: i64) -> bool {
    now.saturating_sub(timestamp) > threshold_secs
}

/// Current wall clock in unix seconds. A clock before the epoch reads as 0.
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
