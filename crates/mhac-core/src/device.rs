// ── Device handle ──
//
// Consumer-facing handle to one climate unit. Starting synchronization
// spawns the synchronizer task; the handle then forwards set and info
// requests to it over a command channel and reads published state
// straight from the shared feeds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mhac_api::{DeviceClient, DeviceInfo, TransportConfig};
use tokio::sync::{Mutex, broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::accessors::{Reader, Writer};
use crate::codec::CodecTable;
use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::{Attribute, DeviceEvent, Snapshot};
use crate::store::Feeds;
use crate::stream::SnapshotStream;
use crate::sync::{Command, SetOutcome, SyncState, Synchronizer};
use crate::transport::DeviceTransport;

const COMMAND_CHANNEL_SIZE: usize = 64;

/// Handle to one MH-AC-WIFI-1 unit.
///
/// Cheaply cloneable. All clones share the same synchronizer, snapshot
/// and event channel. Dropping the last clone stops synchronization.
pub struct Device<T: DeviceTransport = DeviceClient> {
    inner: Arc<DeviceInner<T>>,
}

impl<T: DeviceTransport> Clone for Device<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DeviceInner<T: DeviceTransport> {
    config: DeviceConfig,
    transport: Arc<T>,
    codec: &'static CodecTable,
    feeds: Arc<Feeds>,
    running: Mutex<Option<Running>>,
}

struct Running {
    commands: mpsc::Sender<Command>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl<T: DeviceTransport> Drop for DeviceInner<T> {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().as_ref() {
            running.cancel.cancel();
        }
    }
}

impl Device<DeviceClient> {
    /// Create a handle that talks HTTP to `config.host`.
    pub fn new(config: DeviceConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = DeviceClient::new(&config.host, &transport)?;
        Ok(Self::with_transport(config, client))
    }
}

impl<T: DeviceTransport> Device<T> {
    /// Create a handle over any transport. The configuration is
    /// normalized first.
    pub fn with_transport(config: DeviceConfig, transport: T) -> Self {
        Self {
            inner: Arc::new(DeviceInner {
                config: config.normalized(),
                transport: Arc::new(transport),
                codec: CodecTable::standard(),
                feeds: Arc::new(Feeds::new()),
                running: Mutex::new(None),
            }),
        }
    }

    /// The normalized configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    pub fn codec(&self) -> &'static CodecTable {
        self.inner.codec
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the synchronizer task. The first poll cycle runs straight
    /// away.
    pub async fn start_synchronization(&self) -> Result<(), CoreError> {
        let mut running = self.inner.running.lock().await;
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            return Err(CoreError::AlreadySynchronizing);
        }

        let (commands, receiver) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let synchronizer = Synchronizer::new(
            self.inner.config.clone(),
            Arc::clone(&self.inner.transport),
            self.inner.codec,
            Arc::clone(&self.inner.feeds),
        );
        let handle = tokio::spawn(synchronizer.run(receiver, cancel.clone()));
        debug!(host = %self.inner.config.host, "synchronizer spawned");

        *running = Some(Running {
            commands,
            cancel,
            handle,
        });
        Ok(())
    }

    /// Stop the synchronizer and wait for it to log out. Pending set
    /// requests fail with [`CoreError::NotSynchronizing`]. Does nothing
    /// when not synchronizing.
    pub async fn stop_synchronization(&self) {
        let running = self.inner.running.lock().await.take();
        let Some(running) = running else {
            return;
        };

        running.cancel.cancel();
        drop(running.commands);
        if let Err(e) = running.handle.await {
            error!(error = %e, "synchronizer task failed");
            self.inner.feeds.set_state(SyncState::Stopped);
        }
    }

    pub fn is_synchronizing(&self) -> bool {
        self.inner.feeds.current_state() != SyncState::Stopped
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Typed view over the latest snapshot.
    pub fn get(&self) -> Reader {
        Reader::new(self.inner.feeds.snapshot())
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.feeds.snapshot()
    }

    pub fn snapshot_stream(&self) -> SnapshotStream {
        self.inner.feeds.snapshot_stream()
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.inner.feeds.subscribe()
    }

    pub fn sync_state(&self) -> watch::Receiver<SyncState> {
        self.inner.feeds.sync_state()
    }

    /// When the last successful bulk read was applied.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.feeds.last_refresh()
    }

    /// Hardware details. Routed through the synchronizer while it runs,
    /// sent directly otherwise.
    pub async fn info(&self) -> Result<DeviceInfo, CoreError> {
        let Some(commands) = self.command_sender().await else {
            return Ok(self.inner.transport.info().await?);
        };

        let (respond, response) = oneshot::channel();
        commands
            .send(Command::Info { respond })
            .await
            .map_err(|_| CoreError::NotSynchronizing)?;
        response.await.map_err(|_| CoreError::NotSynchronizing)?
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Typed set requests.
    pub fn set(&self) -> Writer<'_, T> {
        Writer::new(self)
    }

    /// Request that `attribute` be set to `value`.
    ///
    /// The value is validated against the codec before it is queued.
    pub async fn set_attribute(
        &self,
        attribute: Attribute,
        value: f64,
    ) -> Result<SetOutcome, CoreError> {
        self.inner.codec.encode(attribute, value)?;

        let commands = self
            .command_sender()
            .await
            .ok_or(CoreError::NotSynchronizing)?;

        let (respond, response) = oneshot::channel();
        commands
            .send(Command::Set {
                attribute,
                value,
                respond,
            })
            .await
            .map_err(|_| CoreError::NotSynchronizing)?;
        response.await.map_err(|_| CoreError::NotSynchronizing)
    }

    async fn command_sender(&self) -> Option<mpsc::Sender<Command>> {
        self.inner
            .running
            .lock()
            .await
            .as_ref()
            .map(|running| running.commands.clone())
    }
}
