//! Last-seen raw snapshot per entity, used as the "previous" side of deltas.
//!
//! Entries are created on first sighting and replaced on every distinct
//! snapshot; nothing is evicted. All mutation goes through `&mut self`, so
//! whoever owns the store serializes the compare-then-replace per id.

use std::collections::HashMap;

use crate::types::RawSnapshot;

#[derive(Debug, Default, Clone)]
pub struct SnapshotStore {
    last: HashMap<String, RawSnapshot>,
}

/// Outcome of offering a snapshot to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Structurally identical to the stored snapshot; nothing changed.
    Repeat,
    /// Stored; carries the snapshot it replaced, if any.
    Fresh { previous: Option<RawSnapshot> },
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&RawSnapshot> {
        self.last.get(id)
    }

    pub fn put(&mut self, id: impl Into<String>, snapshot: RawSnapshot) -> Option<RawSnapshot> {
        self.last.insert(id.into(), snapshot)
    }

    /// Compare with the stored snapshot for the same machine and replace it
    /// unless the two are identical.
    pub fn observe(&mut self, snapshot: &RawSnapshot) -> Observation {
        if self.last.get(&snapshot.machine_id) == Some(snapshot) {
            return Observation::Repeat;
        }
        let previous = self.put(snapshot.machine_id.clone(), snapshot.clone());
        Observation::Fresh { previous }
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
