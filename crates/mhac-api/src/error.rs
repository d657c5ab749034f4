// ── Transport-layer errors ──
//
// Everything that can go wrong during a single `/api.cgi` exchange.
// `mhac-core` translates these into domain errors; consumers of the
// core crate never match on HTTP status codes directly.

use thiserror::Error;

/// Errors returned by [`DeviceClient`](crate::DeviceClient).
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("HTTP transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The per-request timeout elapsed before the unit answered.
    #[error("request to device timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The unit answered with a non-200 status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The login exchange was rejected.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The unit answered `success: false` for a command.
    #[error("device rejected '{command}': {message}")]
    Protocol { command: String, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("failed to deserialize response: {message}")]
    Deserialization { message: String, body: String },

    /// The configured host could not be turned into an endpoint URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Whether this error came from a rejected login.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Whether the unit was unreachable or too slow, as opposed to answering
    /// with something we did not like.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
