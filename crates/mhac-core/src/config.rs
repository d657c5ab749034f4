// ── Runtime device configuration ──
//
// Describes *which* unit to talk to and how often. Carries credentials
// and timing, never touches disk. The CLI constructs a `DeviceConfig`
// (usually via mhac-config) and hands it to `Device`.

use std::time::Duration;

use secrecy::SecretString;
use tracing::info;

/// Lowest setpoint bound the unit accepts, in °C.
pub const MIN_SETPOINT_FLOOR: f64 = 18.0;
/// Highest setpoint bound the unit accepts, in °C.
pub const MAX_SETPOINT_CEILING: f64 = 30.0;
/// Shortest allowed poll period.
pub const MIN_SYNC_PERIOD: Duration = Duration::from_secs(1);

pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(500);
pub const DEFAULT_SYNC_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for one climate unit.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Address of the Wi-Fi adapter (`192.168.1.40` or a full base URL).
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Bulk reads slower than this are logged as warnings.
    pub slow_threshold: Duration,
    /// Pushed to the unit after every login. Raised to 18 °C if lower.
    pub min_setpoint: f64,
    /// Pushed to the unit after every login. Lowered to 30 °C if higher.
    pub max_setpoint: f64,
    /// Delay between poll cycles while authenticated.
    pub sync_period: Duration,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    pub timing: SyncTiming,
}

/// Back-off and retry timing of the synchronizer.
///
/// The defaults match the unit's behaviour; tests shorten them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTiming {
    /// Delay before the next cycle when no session is held.
    pub unauthenticated_backoff: Duration,
    /// Wait after a failed write before retrying.
    pub retry_backoff: Duration,
    /// Wait after a successful write before looking for changes.
    pub settle_delay: Duration,
    /// Trailing window in which repeated writes to one attribute collapse.
    pub debounce_window: Duration,
    /// Write attempts per command.
    pub max_attempts: u32,
}

impl Default for SyncTiming {
    fn default() -> Self {
        Self {
            unauthenticated_backoff: Duration::from_secs(30),
            retry_backoff: Duration::from_secs(2),
            settle_delay: Duration::from_secs(1),
            debounce_window: Duration::from_millis(500),
            max_attempts: 3,
        }
    }
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
            min_setpoint: MIN_SETPOINT_FLOOR,
            max_setpoint: MAX_SETPOINT_CEILING,
            sync_period: DEFAULT_SYNC_PERIOD,
            timeout: DEFAULT_TIMEOUT,
            timing: SyncTiming::default(),
        }
    }

    pub fn with_setpoint_range(mut self, min: f64, max: f64) -> Self {
        self.min_setpoint = min;
        self.max_setpoint = max;
        self
    }

    pub fn with_sync_period(mut self, period: Duration) -> Self {
        self.sync_period = period;
        self
    }

    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timing(mut self, timing: SyncTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Clamp the setpoint bounds and poll period into what the unit
    /// supports, logging each adjustment.
    pub fn normalized(mut self) -> Self {
        if self.min_setpoint.is_nan() || self.min_setpoint < MIN_SETPOINT_FLOOR {
            self.min_setpoint = MIN_SETPOINT_FLOOR;
        }
        info!(min_setpoint = self.min_setpoint, "minimum setpoint");

        if self.max_setpoint.is_nan() || self.max_setpoint > MAX_SETPOINT_CEILING {
            self.max_setpoint = MAX_SETPOINT_CEILING;
        }
        info!(max_setpoint = self.max_setpoint, "maximum setpoint");

        if self.sync_period < MIN_SYNC_PERIOD {
            self.sync_period = MIN_SYNC_PERIOD;
        }
        info!(sync_period_ms = millis(self.sync_period), "sync period");

        if self.slow_threshold.is_zero() {
            self.slow_threshold = DEFAULT_SLOW_THRESHOLD;
        }
        info!(slow_threshold_ms = millis(self.slow_threshold), "slow response threshold");

        if self.timing.max_attempts == 0 {
            self.timing.max_attempts = 1;
        }
        self
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
