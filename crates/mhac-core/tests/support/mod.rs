// In-memory stand-in for an MH-AC-WIFI-1 unit.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tokio::time::Instant;

use mhac_api::{DeviceInfo, Error, SensorReading};
use mhac_core::{AttributeChange, DeviceConfig, DeviceEvent, DeviceTransport};

/// Wire readings of a unit cooling at 24.5 °C with swing on.
pub const STANDARD_READINGS: &[(u16, i64)] = &[
    (1, 1),
    (2, 4),
    (4, 2),
    (5, 10),
    (9, 245),
    (10, 231),
    (12, 0),
    (13, 1200),
    (14, 0),
    (15, 0),
    (34, 0),
    (35, 180),
    (36, 300),
    (37, -35),
    (181, 0),
    (182, 0),
    (183, 1),
    (184, 0),
];

#[derive(Default)]
pub struct FakeState {
    pub values: BTreeMap<u16, i64>,
    pub fail_login: bool,
    pub fail_writes: bool,
    /// 1-based bulk-read numbers that fail.
    pub failing_reads: Vec<usize>,
    pub login_times: Vec<Instant>,
    pub reads: usize,
    pub logouts: usize,
    pub write_attempts: Vec<(u16, i64)>,
    pub writes: Vec<(u16, i64)>,
    sessions: usize,
}

#[derive(Clone, Default)]
pub struct FakeUnit {
    state: Arc<Mutex<FakeState>>,
}

impl FakeUnit {
    pub fn new() -> Self {
        let unit = Self::default();
        unit.state().values = STANDARD_READINGS.iter().copied().collect();
        unit
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn logins(&self) -> usize {
        self.state().login_times.len()
    }

    pub fn reads(&self) -> usize {
        self.state().reads
    }

    pub fn writes_to(&self, uid: u16) -> Vec<i64> {
        self.state()
            .writes
            .iter()
            .filter(|(u, _)| *u == uid)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn write_attempts_to(&self, uid: u16) -> usize {
        self.state()
            .write_attempts
            .iter()
            .filter(|(u, _)| *u == uid)
            .count()
    }

    fn check_session(&self, session: &str) -> Result<(), Error> {
        let state = self.state();
        if session == format!("session-{}", state.sessions) {
            Ok(())
        } else {
            Err(rejected("wrong session"))
        }
    }
}

fn rejected(message: &str) -> Error {
    Error::Protocol {
        command: "fake".into(),
        message: message.into(),
    }
}

impl DeviceTransport for FakeUnit {
    async fn login(&self, _username: &str, _password: &SecretString) -> Result<String, Error> {
        let mut state = self.state();
        state.login_times.push(Instant::now());
        if state.fail_login {
            return Err(Error::Authentication {
                message: "invalid credentials".into(),
            });
        }
        state.sessions += 1;
        Ok(format!("session-{}", state.sessions))
    }

    async fn logout(&self, session: &str) -> Result<(), Error> {
        self.check_session(session)?;
        self.state().logouts += 1;
        Ok(())
    }

    async fn info(&self) -> Result<DeviceInfo, Error> {
        Ok(DeviceInfo {
            model: Some("MH-AC-WIFI-1".into()),
            serial_number: Some("FAKE0001".into()),
            ..DeviceInfo::default()
        })
    }

    async fn available_services(&self, session: &str) -> Result<Vec<String>, Error> {
        self.check_session(session)?;
        Ok(vec!["getdatapointvalue".into(), "setdatapointvalue".into()])
    }

    async fn available_datapoints(&self, session: &str) -> Result<Vec<Value>, Error> {
        self.check_session(session)?;
        Ok(vec![json!({ "uid": 1, "rw": "rw" })])
    }

    async fn read_all(&self, session: &str) -> Result<Vec<SensorReading>, Error> {
        self.check_session(session)?;
        let mut state = self.state();
        state.reads += 1;
        if state.failing_reads.contains(&state.reads) {
            return Err(Error::Timeout { timeout_ms: 5000 });
        }
        Ok(state
            .values
            .iter()
            .map(|(&uid, &value)| SensorReading::new(uid, value))
            .collect())
    }

    async fn write(&self, session: &str, uid: u16, value: i64) -> Result<(), Error> {
        self.check_session(session)?;
        let mut state = self.state();
        state.write_attempts.push((uid, value));
        if state.fail_writes {
            return Err(rejected("write refused"));
        }
        state.writes.push((uid, value));
        state.values.insert(uid, value);
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

pub fn config() -> DeviceConfig {
    DeviceConfig::new("fake-unit", "admin", SecretString::from("admin".to_owned()))
}

/// Collect `Changed` events up to the next `Updated`.
pub async fn next_batch(events: &mut broadcast::Receiver<DeviceEvent>) -> Vec<AttributeChange> {
    let mut batch = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(600), events.recv())
            .await
            .expect("timed out waiting for an update")
            .unwrap();
        match event {
            DeviceEvent::Changed(change) => batch.push(change),
            DeviceEvent::Updated => return batch,
        }
    }
}

/// Skip batches until one reports the power attribute, i.e. the first
/// full refresh after a login.
pub async fn next_full_refresh(
    events: &mut broadcast::Receiver<DeviceEvent>,
) -> Vec<AttributeChange> {
    loop {
        let batch = next_batch(events).await;
        if batch
            .iter()
            .any(|c| c.attribute == mhac_core::Attribute::Active)
        {
            return batch;
        }
    }
}
