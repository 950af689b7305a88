//! Metric derivation engine for the Kunlun monitor.
//!
//! Turns consecutive cumulative snapshots from a host into rates,
//! percentages and summary fields. All shares and utilizations are
//! fractions in `[0, 1]` rounded to two decimals.

pub mod calc;
pub mod engine;
pub mod error;
pub mod freshness;
pub mod history;
pub mod report;
pub mod restart;
pub mod store;
pub mod types;

pub use engine::Engine;
pub use error::EngineError;
pub use freshness::{is_stale, is_stale_after, now_unix, DEFAULT_STALE_SECS};
pub use history::{decode_history, normalize_history, Granularity, HistoryPoint, HistoryRecord};
pub use report::{EnrichedReport, Summary};
pub use restart::{ClampOnly, RestartDetector, UptimeRegression};
pub use store::{Observation, SnapshotStore};
pub use types::{decode_batch, RawSnapshot};

/// Enrich `current` against `previous`, stamping freshness with the wall clock.
pub fn enrich(current: &RawSnapshot, previous: Option<&RawSnapshot>) -> EnrichedReport {
    enrich_at(current, previous, now_unix())
}

pub fn enrich_at(current: &RawSnapshot, previous: Option<&RawSnapshot>, now: i64) -> EnrichedReport {
    report::assemble(current, previous, now, DEFAULT_STALE_SECS)
}
