// ── Device transport seam ──
//
// The synchronizer talks to the unit through this trait so it can be
// driven by an in-memory fake in tests. `DeviceClient` is the real
// implementation.

use std::future::Future;

use mhac_api::{DeviceClient, DeviceInfo, Error, SensorReading};
use secrecy::SecretString;
use serde_json::Value;

/// One request/response exchange per call. Implementations must not
/// retry internally; the synchronizer owns retry policy.
pub trait DeviceTransport: Send + Sync + 'static {
    fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<String, Error>> + Send;

    fn logout(&self, session: &str) -> impl Future<Output = Result<(), Error>> + Send;

    fn info(&self) -> impl Future<Output = Result<DeviceInfo, Error>> + Send;

    fn available_services(
        &self,
        session: &str,
    ) -> impl Future<Output = Result<Vec<String>, Error>> + Send;

    fn available_datapoints(
        &self,
        session: &str,
    ) -> impl Future<Output = Result<Vec<Value>, Error>> + Send;

    fn read_all(&self, session: &str)
    -> impl Future<Output = Result<Vec<SensorReading>, Error>> + Send;

    fn write(
        &self,
        session: &str,
        uid: u16,
        value: i64,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

impl DeviceTransport for DeviceClient {
    async fn login(&self, username: &str, password: &SecretString) -> Result<String, Error> {
        DeviceClient::login(self, username, password).await
    }

    async fn logout(&self, session: &str) -> Result<(), Error> {
        DeviceClient::logout(self, session).await
    }

    async fn info(&self) -> Result<DeviceInfo, Error> {
        self.get_info().await
    }

    async fn available_services(&self, session: &str) -> Result<Vec<String>, Error> {
        self.get_available_services(session).await
    }

    async fn available_datapoints(&self, session: &str) -> Result<Vec<Value>, Error> {
        self.get_available_datapoints(session).await
    }

    async fn read_all(&self, session: &str) -> Result<Vec<SensorReading>, Error> {
        self.get_all_values(session).await
    }

    async fn write(&self, session: &str, uid: u16, value: i64) -> Result<(), Error> {
        self.set_value(session, uid, value).await
    }
}
