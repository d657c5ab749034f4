//! Async client for the local HTTP control interface of the MH-AC-WIFI-1
//! air-conditioner Wi-Fi board.
//!
//! The unit exposes a single endpoint, `POST /api.cgi`, that accepts a
//! `{ "command": ..., "data": { ... } }` JSON body and answers with a
//! `{ "success": bool, "data": { ... } }` envelope. [`DeviceClient`] wraps
//! that exchange and offers one typed method per command.
//!
//! The client is stateless with respect to authentication: callers obtain a
//! session id from [`DeviceClient::login`] and pass it to every subsequent
//! call. Session ownership lives one layer up, in `mhac-core`.

pub mod auth;
pub mod client;
pub mod datapoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DeviceClient;
pub use error::Error;
pub use models::{DeviceInfo, SensorReading};
pub use transport::TransportConfig;
