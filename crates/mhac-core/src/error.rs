// ── Core error types ──
//
// User-facing errors from mhac-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<mhac_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::codec::CodecError;
use crate::model::Attribute;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Device did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ── State errors ─────────────────────────────────────────────────
    /// No valid snapshot is held: the device has not been read since
    /// start-up or the last reset.
    #[error("Communication failure: device state is unknown")]
    CommunicationFailure,

    #[error("Attribute {attribute} has not been reported by the device")]
    AttributeUnavailable { attribute: Attribute },

    #[error("Attribute {attribute} holds unexpected value {value}")]
    UnexpectedValue { attribute: Attribute, value: f64 },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Invalid value: {0}")]
    Codec(#[from] CodecError),

    #[error("Device is not synchronizing")]
    NotSynchronizing,

    #[error("Device is already synchronizing")]
    AlreadySynchronizing,

    #[error("Command rejected by device: {message}")]
    Rejected { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mhac_api::Error> for CoreError {
    fn from(err: mhac_api::Error) -> Self {
        match err {
            mhac_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            mhac_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            mhac_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_ms: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            mhac_api::Error::Http { status, body } => CoreError::Api {
                message: body,
                status: Some(status),
            },
            mhac_api::Error::Protocol { command, message } => CoreError::Rejected {
                message: format!("{command}: {message}"),
            },
            mhac_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device address: {e}"),
            },
            mhac_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
