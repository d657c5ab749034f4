//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use mhac_config::ConfigError;
use mhac_core::{CodecError, CoreError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the unit: {reason}")]
    #[diagnostic(
        code(mhac::connection_failed),
        help(
            "Check that the adapter is powered and on the same network.\n\
             Try: mhac info -vv"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("No state received from {host} within {seconds}s")]
    #[diagnostic(
        code(mhac::no_state),
        help(
            "The adapter did not answer or refused the login.\n\
             Check the address and password, or raise --wait."
        )
    )]
    NoState { host: String, seconds: u64 },

    #[error("Request timed out after {timeout_ms}ms")]
    #[diagnostic(
        code(mhac::timeout),
        help("Increase the timeout with --timeout or check the adapter's Wi-Fi signal.")
    )]
    Timeout { timeout_ms: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(mhac::auth_failed),
        help("Verify the password. Store a new one with: mhac config set-password")
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(mhac::no_credentials),
        help(
            "Store one with: mhac config set-password\n\
             Or set the MHAC_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("{attribute} has not been reported by the unit")]
    #[diagnostic(code(mhac::unavailable))]
    Unavailable { attribute: String },

    #[error("The unit did not accept the request: {message}")]
    #[diagnostic(code(mhac::rejected))]
    Rejected { message: String },

    #[error("Device error: {message}")]
    #[diagnostic(code(mhac::device))]
    Device { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Unknown attribute '{name}'")]
    #[diagnostic(
        code(mhac::unknown_attribute),
        help("Run: mhac attributes to see the attributes the unit exposes")
    )]
    UnknownAttribute { name: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mhac::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mhac::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mhac config set host <address> --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No unit configured")]
    #[diagnostic(
        code(mhac::no_config),
        help(
            "Pass --host, or create a profile with: mhac config set host <address>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(mhac::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(code(mhac::keyring))]
    Keyring(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::NoState { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Unavailable { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::UnknownAttribute { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_ms } => CliError::Timeout { timeout_ms },

            CoreError::AttributeUnavailable { attribute } => CliError::Unavailable {
                attribute: attribute.to_string(),
            },

            CoreError::Codec(codec) => codec.into(),

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            other => CliError::Device {
                message: other.to_string(),
            },
        }
    }
}

impl From<CodecError> for CliError {
    fn from(err: CodecError) -> Self {
        let field = match &err {
            CodecError::ReadOnly { attribute }
            | CodecError::OutOfDomain { attribute, .. }
            | CodecError::UnknownLabel { attribute, .. }
            | CodecError::Unmapped { attribute } => attribute.to_string(),
            _ => "value".into(),
        };
        CliError::Validation {
            field,
            reason: err.to_string(),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
