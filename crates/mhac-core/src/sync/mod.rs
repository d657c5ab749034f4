// ── Synchronizer ──
//
// The single task that owns the session and the state store. Poll
// cycles, debounced writes and `getinfo` requests are serialized through
// its loop, so at most one exchange with the unit is in flight and the
// store is only ever mutated from here.

mod debounce;
mod dispatch;

pub use dispatch::SetOutcome;

use std::future;
use std::sync::Arc;
use std::time::Duration;

use mhac_api::DeviceInfo;
use serde::Serialize;
use strum::Display;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use self::debounce::Debouncer;
use crate::codec::CodecTable;
use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::{Attribute, DeviceEvent};
use crate::session::SessionManager;
use crate::store::{Feeds, StateStore};
use crate::transport::DeviceTransport;

/// Lifecycle of the synchronizer as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SyncState {
    /// No synchronizer task is running.
    Stopped,
    /// Running, but no session is held. Cycles back off.
    Unauthenticated,
    /// Running with a live session.
    Authenticated,
}

/// Requests from `Device` handles to the synchronizer task.
pub(crate) enum Command {
    Set {
        attribute: Attribute,
        value: f64,
        respond: oneshot::Sender<SetOutcome>,
    },
    Info {
        respond: oneshot::Sender<Result<DeviceInfo, CoreError>>,
    },
}

pub(crate) struct Synchronizer<T> {
    config: DeviceConfig,
    transport: Arc<T>,
    codec: &'static CodecTable,
    session: SessionManager,
    store: StateStore,
    feeds: Arc<Feeds>,
    debouncer: Debouncer,
    /// Set by every successful login; cleared once the post-login
    /// bootstrap has run.
    needs_bootstrap: bool,
    next_cycle: Instant,
}

impl<T: DeviceTransport> Synchronizer<T> {
    pub(crate) fn new(
        config: DeviceConfig,
        transport: Arc<T>,
        codec: &'static CodecTable,
        feeds: Arc<Feeds>,
    ) -> Self {
        let session = SessionManager::new(config.username.clone(), config.password.clone());
        let debouncer = Debouncer::new(config.timing.debounce_window);
        Self {
            config,
            transport,
            codec,
            session,
            store: StateStore::new(),
            feeds,
            debouncer,
            needs_bootstrap: false,
            next_cycle: Instant::now(),
        }
    }

    // ── Task loop ────────────────────────────────────────────────────

    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        cancel: CancellationToken,
    ) {
        info!(host = %self.config.host, "synchronization started");
        self.feeds.set_state(SyncState::Unauthenticated);

        loop {
            let debounce_deadline = self.debouncer.next_deadline();
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                command = commands.recv() => match command {
                    Some(command) => self.accept(command).await,
                    None => break,
                },
                () = sleep_until(debounce_deadline) => self.dispatch_due().await,
                () = time::sleep_until(self.next_cycle) => {
                    let delay = self.cycle().await;
                    trace!(delay_ms = millis(delay), "next cycle scheduled");
                    self.next_cycle = Instant::now() + delay;
                }
            }
        }

        self.shutdown().await;
    }

    async fn accept(&mut self, command: Command) {
        match command {
            Command::Set {
                attribute,
                value,
                respond,
            } => {
                debug!(%attribute, value, "set request queued");
                self.debouncer
                    .push(attribute, value, respond, Instant::now());
            }
            Command::Info { respond } => {
                let result = self.transport.info().await.map_err(CoreError::from);
                let _ = respond.send(result);
            }
        }
    }

    async fn dispatch_due(&mut self) {
        for (attribute, pending) in self.debouncer.take_due(Instant::now()) {
            let outcome = self.dispatch(attribute, pending.value).await;
            pending.resolve(outcome);
        }
    }

    async fn shutdown(&mut self) {
        let abandoned = self.debouncer.abandon();
        if abandoned > 0 {
            debug!(abandoned, "dropping pending set requests");
        }
        self.session.logout(&*self.transport).await;
        self.store.clear();
        self.feeds.publish_snapshot(self.store.current());
        self.feeds.set_state(SyncState::Stopped);
        info!(host = %self.config.host, "synchronization stopped");
    }

    // ── Poll cycle ───────────────────────────────────────────────────

    /// One poll cycle. Returns the delay until the next one.
    async fn cycle(&mut self) -> Duration {
        if !self.session.is_authenticated() && self.login().await.is_err() {
            return self.next_delay();
        }

        if self.needs_bootstrap {
            self.bootstrap().await;
        }

        if let Some(token) = self.session.token().map(str::to_owned) {
            self.refresh(&token).await;
        }

        self.next_delay()
    }

    fn next_delay(&self) -> Duration {
        if self.session.is_authenticated() {
            self.config.sync_period
        } else {
            self.config.timing.unauthenticated_backoff
        }
    }

    /// Post-login work: log what the unit offers, then push the
    /// configured setpoint bounds.
    async fn bootstrap(&mut self) {
        self.needs_bootstrap = false;

        let Some(token) = self.session.token().map(str::to_owned) else {
            return;
        };

        match self.transport.available_services(&token).await {
            Ok(services) => debug!(?services, "available services"),
            Err(e) => {
                error!(error = %e, "unable to get available services");
                self.reset();
                return;
            }
        }

        match self.transport.available_datapoints(&token).await {
            Ok(datapoints) => debug!(count = datapoints.len(), ?datapoints, "available datapoints"),
            Err(e) => {
                error!(error = %e, "unable to get available datapoints");
                self.reset();
                return;
            }
        }

        let bounds = [
            (Attribute::MinSetpoint, self.config.min_setpoint),
            (Attribute::MaxSetpoint, self.config.max_setpoint),
        ];
        for (attribute, value) in bounds {
            if !self.dispatch(attribute, value).await.is_applied() {
                error!(%attribute, value, "unable to push setpoint bound");
            }
        }
    }

    async fn refresh(&mut self, token: &str) {
        let started = Instant::now();
        let readings = match self.transport.read_all(token).await {
            Ok(readings) => readings,
            Err(e) => {
                error!(error = %e, "unable to refresh state");
                self.reset();
                return;
            }
        };

        let elapsed = started.elapsed();
        if elapsed > self.config.slow_threshold {
            warn!(
                host = %self.config.host,
                elapsed_ms = millis(elapsed),
                "slow response from device"
            );
        }

        let report = self.store.apply_readings(self.codec, &readings);
        for reading in &report.unknown {
            error!(uid = reading.uid, value = reading.value, "unhandled sensor item");
        }
        trace!(
            decoded = report.decoded,
            ignored = report.ignored,
            unknown = report.unknown.len(),
            "applied sensor readings"
        );

        self.feeds.publish_snapshot(self.store.current());
        self.feeds.mark_refreshed();
        self.detect_and_notify().await;
    }

    /// Emit a `Changed` event per moved attribute, then one `Updated`
    /// after yielding once so listeners can drain the batch. Nothing is
    /// emitted when nothing moved.
    async fn detect_and_notify(&mut self) {
        let changes = self.store.detect_changes();
        if changes.is_empty() {
            return;
        }

        for change in changes {
            info!(
                attribute = %change.attribute,
                old = ?change.old,
                new = change.new,
                "state change"
            );
            self.feeds.emit(DeviceEvent::Changed(change));
        }
        tokio::task::yield_now().await;
        self.feeds.emit(DeviceEvent::Updated);
    }

    // ── Session handling ─────────────────────────────────────────────

    async fn login(&mut self) -> Result<String, CoreError> {
        debug!("logging in to obtain a session id");
        match self.session.login(&*self.transport).await {
            Ok(token) => {
                debug!("obtained a new session id");
                self.store.clear();
                self.feeds.publish_snapshot(self.store.current());
                self.needs_bootstrap = true;
                self.feeds.set_state(SyncState::Authenticated);
                Ok(token)
            }
            Err(e) => {
                error!(error = %e, "unable to authenticate");
                self.reset();
                Err(e)
            }
        }
    }

    /// Session for a write. A login made here also pulls the next poll
    /// forward, so the store is refilled without waiting out the
    /// unauthenticated back-off.
    async fn ensure_session(&mut self) -> Result<String, CoreError> {
        if let Some(token) = self.session.token() {
            return Ok(token.to_owned());
        }
        let token = self.login().await?;
        self.next_cycle = Instant::now();
        Ok(token)
    }

    /// Forget the session and all state after a failed exchange.
    fn reset(&mut self) {
        info!("resetting device state");
        self.session.invalidate();
        self.store.clear();
        self.feeds.publish_snapshot(self.store.current());
        self.feeds.set_state(SyncState::Unauthenticated);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
