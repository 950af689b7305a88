//! Coordinator: owns the snapshot store and runs dedup → restart check →
//! calculators → assembly for each incoming snapshot.

use std::collections::BTreeMap;

use tracing::debug;

use crate::freshness::{is_stale_after, DEFAULT_STALE_SECS};
use crate::report::{assemble, EnrichedReport};
use crate::restart::{ClampOnly, RestartDetector};
use crate::store::{Observation, SnapshotStore};
use crate::types::RawSnapshot;

pub struct Engine {
    store: SnapshotStore,
    // latest report per machine id
    latest: BTreeMap<String, EnrichedReport>,
    detector: Box<dyn RestartDetector>,
    stale_secs: i64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            store: SnapshotStore::new(),
            latest: BTreeMap::new(),
            detector: Box::new(ClampOnly),
            stale_secs: DEFAULT_STALE_SECS,
        }
    }

    pub fn with_detector(mut self, detector: Box<dyn RestartDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_stale_secs(mut self, secs: i64) -> Self {
        self.stale_secs = secs;
        self
    }

    pub fn stale_secs(&self) -> i64 {
        self.stale_secs
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Enrich a snapshot against the stored predecessor and remember it.
    /// Returns `None` for an exact repeat of the stored snapshot.
    pub fn ingest(&mut self, snapshot: RawSnapshot, now: i64) -> Option<EnrichedReport> {
        let previous = match self.store.observe(&snapshot) {
            Observation::Repeat => {
                debug!(machine_id = %snapshot.machine_id, "repeated snapshot, skipping");
                return None;
            }
            Observation::Fresh { previous } => previous,
        };

        let previous = previous.filter(|prev| {
            let restarted = self.detector.restarted(&snapshot, prev);
            if restarted {
                debug!(
                    machine_id = %snapshot.machine_id,
                    uptime_s = snapshot.uptime_s,
                    "host restarted, computing since boot"
                );
            }
            !restarted
        });

        let report = assemble(&snapshot, previous.as_ref(), now, self.stale_secs);
        self.latest.insert(snapshot.machine_id.clone(), report.clone());
        Some(report)
    }

    /// Ingest in arrival order; returns the reports that changed.
    pub fn ingest_batch<I>(&mut self, batch: I, now: i64) -> Vec<EnrichedReport>
    where
        I: IntoIterator<Item = RawSnapshot>,
    {
        batch
            .into_iter()
            .filter_map(|s| self.ingest(s, now))
            .collect()
    }

    /// Latest report per machine with the offline flag re-evaluated at `now`.
    pub fn reports(&mut self, now: i64) -> Vec<EnrichedReport> {
        let stale = self.stale_secs;
        self.latest
            .values_mut()
            .map(|r| {
                r.refresh_offline(now, stale);
                r.clone()
            })
            .collect()
    }

    /// (online, total) over every machine seen so far.
    pub fn online_count(&self, now: i64) -> (usize, usize) {
        let online = self
            .latest
            .values()
            .filter(|r| !is_stale_after(r.raw.timestamp, now, self.stale_secs))
            .count();
        (online, self.latest.len())
    }
}
