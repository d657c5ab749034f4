// ── Device state store ──
//
// Two snapshots: `current`, the latest decoded state, and `previous`,
// what change detection last reported. Owned by the synchronizer task;
// readers see published copies through `Feeds`.

mod changes;
mod feeds;
mod refresh;

pub(crate) use feeds::Feeds;

use crate::model::{Attribute, Snapshot};

#[derive(Debug, Default)]
pub(crate) struct StateStore {
    current: Snapshot,
    previous: Snapshot,
}

impl StateStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current(&self) -> &Snapshot {
        &self.current
    }

    #[cfg(test)]
    pub(crate) fn previous(&self) -> &Snapshot {
        &self.previous
    }

    /// Record a value the unit has just acknowledged.
    pub(crate) fn set(&mut self, attribute: Attribute, value: f64) {
        self.current.insert(attribute, value);
    }

    /// Empty both snapshots. The next refresh reports every attribute
    /// as changed from nothing.
    pub(crate) fn clear(&mut self) {
        self.current.clear();
        self.previous.clear();
    }
}
