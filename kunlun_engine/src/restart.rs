//! Host restart detection.
//!
//! Snapshots carry no boot id, so a restart can only be inferred. The default
//! detector never infers one and leaves negative deltas to the calculators'
//! zero floor; `UptimeRegression` treats uptime going backwards as a reboot.

use crate::types::RawSnapshot;

pub trait RestartDetector: Send + Sync {
    /// Whether `current` was taken after a restart that `previous` predates.
    fn restarted(&self, current: &RawSnapshot, previous: &RawSnapshot) -> bool;
}

/// Never reports a restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClampOnly;

impl RestartDetector for ClampOnly {
    fn restarted(&self, _current: &RawSnapshot, _previous: &RawSnapshot) -> bool {
        false
    }
}

/// Reports a restart when uptime is lower than in the previous snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct UptimeRegression;

impl RestartDetector for UptimeRegression {
    fn restarted(&self, current: &RawSnapshot, previous: &RawSnapshot) -> bool {
        current.uptime_s < previous.uptime_s
    }
}

/// Pick a detector by name; unknown names fall back to `ClampOnly`.
pub fn detector_from_name(name: &str) -> Box<dyn RestartDetector> {
    match name.trim().to_ascii_lowercase().as_str() {
        "uptime" | "uptime-regression" => Box::new(UptimeRegression),
        _ => Box::new(ClampOnly),
    }
}
