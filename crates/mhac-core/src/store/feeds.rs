// ── Published state ──
//
// The reader-facing side of the store: a watch channel carrying the
// latest snapshot, a broadcast channel carrying change events, and the
// synchronizer's lifecycle state. Shared between the `Device` handle
// and whichever synchronizer task is running.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};

use crate::model::{DeviceEvent, Snapshot};
use crate::stream::SnapshotStream;
use crate::sync::SyncState;

const EVENT_CHANNEL_SIZE: usize = 256;

pub(crate) struct Feeds {
    snapshot: watch::Sender<Arc<Snapshot>>,
    events: broadcast::Sender<DeviceEvent>,
    state: watch::Sender<SyncState>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl Feeds {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::new()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let (state, _) = watch::channel(SyncState::Stopped);
        let (last_refresh, _) = watch::channel(None);
        Self {
            snapshot,
            events,
            state,
            last_refresh,
        }
    }

    // ── Writers (synchronizer task only) ─────────────────────────────

    pub(crate) fn publish_snapshot(&self, snapshot: &Snapshot) {
        self.snapshot.send_if_modified(|published| {
            if **published == *snapshot {
                false
            } else {
                *published = Arc::new(snapshot.clone());
                true
            }
        });
    }

    pub(crate) fn emit(&self, event: DeviceEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    pub(crate) fn set_state(&self, state: SyncState) {
        self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    pub(crate) fn mark_refreshed(&self) {
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    // ── Readers ──────────────────────────────────────────────────────

    pub(crate) fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn snapshot_stream(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    pub(crate) fn sync_state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub(crate) fn current_state(&self) -> SyncState {
        *self.state.borrow()
    }

    pub(crate) fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }
}
