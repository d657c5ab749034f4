// Device HTTP client
//
// Wraps `reqwest::Client` with endpoint construction, session-id
// injection, and envelope unwrapping. The per-command methods live in
// `auth.rs` and `datapoints.rs` as inherent impls so this module stays
// focused on transport mechanics.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Envelope, Request};
use crate::transport::{DEFAULT_REQUEST_TIMEOUT, TransportConfig};

/// Path of the single control endpoint on the unit.
pub const API_PATH: &str = "/api.cgi";

/// The bulk read runs every sync period; logging it at debug level would
/// drown everything else.
const QUIET_COMMANDS: &[&str] = &["getdatapointvalue"];

/// Stateless HTTP client for one MH-AC-WIFI-1 unit.
///
/// Cheap to clone (the inner `reqwest::Client` is reference counted).
/// Methods that need a session take the session id as an argument; the
/// client never stores one.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl DeviceClient {
    /// Create a client for `host`.
    ///
    /// `host` is either a bare address (`192.168.1.40`, `aircon.lan:8080`)
    /// or a full base URL (`http://192.168.1.40`).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = base_url_for(host)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint: base_url.join(API_PATH)?,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for configuring timeouts on `http`.
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Result<Self, Error> {
        Ok(Self {
            http,
            endpoint: base_url.join(API_PATH)?,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// The full `/api.cgi` URL this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // ── Exchange ─────────────────────────────────────────────────────

    /// Send `command` with `data`, adding `sessionID` when a session is
    /// given, and return the unwrapped `data` payload.
    pub(crate) async fn exchange<T: DeserializeOwned>(
        &self,
        command: &str,
        mut data: Map<String, Value>,
        session: Option<&str>,
    ) -> Result<T, Error> {
        // Log before credentials are added.
        if !QUIET_COMMANDS.contains(&command) && command != "login" {
            let shown = Value::Object(data.clone());
            debug!(command, data = %shown, "POST {}", self.endpoint);
        }

        if let Some(session) = session {
            data.insert("sessionID".into(), Value::String(session.to_owned()));
        }

        let body = Request {
            command,
            data: &data,
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        self.parse_envelope(command, resp).await
    }

    /// Check the HTTP status and the `success` flag, then deserialize `data`.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        command: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            debug!(command, status = status.as_u16(), "received HTTP error");
            return Err(Error::Http {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let body = resp.text().await.map_err(|e| self.map_transport(e))?;

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", truncate(&body)),
            body: body.clone(),
        })?;

        if !envelope.success {
            debug!(command, body = %truncate(&body), "received error response");
            let message = envelope
                .error
                .map_or_else(|| "success=false".to_owned(), |err| err.describe());
            return Err(Error::Protocol {
                command: command.to_owned(),
                message,
            });
        }

        serde_json::from_value(envelope.data).map_err(|e| Error::Deserialization {
            message: format!("{command}: {e}"),
            body,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Turn a configured host into a base URL.
fn base_url_for(host: &str) -> Result<Url, Error> {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        Ok(Url::parse(host)?)
    } else {
        Ok(Url::parse(&format!("http://{host}"))?)
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        let client = DeviceClient::new("192.168.1.40", &TransportConfig::default()).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://192.168.1.40/api.cgi");
    }

    #[test]
    fn host_with_port_and_trailing_slash() {
        let client = DeviceClient::new("aircon.lan:8080/", &TransportConfig::default()).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://aircon.lan:8080/api.cgi");
    }

    #[test]
    fn full_url_is_kept() {
        let client =
            DeviceClient::new("http://10.0.0.7:9000", &TransportConfig::default()).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://10.0.0.7:9000/api.cgi");
    }

    #[test]
    fn invalid_host_is_rejected() {
        let result = DeviceClient::new("http://", &TransportConfig::default());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn truncate_limits_preview() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), 200);
    }
}
