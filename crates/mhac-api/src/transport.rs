// ── HTTP transport configuration ──
//
// Builds the `reqwest::Client` used for every exchange with the unit.
// The board only speaks plain HTTP on the local network, so the only
// tuning knob that matters is the per-request timeout.

use std::time::Duration;

use crate::error::Error;

/// Per-request timeout used when none is configured.
///
/// The board is slow but never takes this long on a healthy network; a hung
/// exchange is aborted and reported as [`Error::Timeout`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport settings shared by all clients talking to the same unit.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Hard deadline for a single request/response exchange.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("mhac/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` with these settings applied.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(Error::Transport)
    }
}
