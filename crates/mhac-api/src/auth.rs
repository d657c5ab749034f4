// Session login/logout
//
// The unit issues an opaque session id on `login`; every later command
// must echo it back as `data.sessionID`. Keeping the id is the caller's
// job.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::LoginData;

impl DeviceClient {
    /// Authenticate with username/password and return the new session id.
    ///
    /// Any rejection of the login exchange (`success: false`, HTTP 401/403)
    /// is reported as [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<String, Error> {
        debug!(username, "logging in at {}", self.endpoint());

        let mut data = Map::new();
        data.insert("username".into(), json!(username));
        data.insert("password".into(), json!(password.expose_secret()));

        let result: Result<LoginData, Error> = self.exchange("login", data, None).await;
        match result {
            Ok(login) => {
                debug!("login successful");
                Ok(login.id.session_id)
            }
            Err(Error::Protocol { message, .. }) => Err(Error::Authentication { message }),
            Err(Error::Http { status, body }) if status == 401 || status == 403 => {
                Err(Error::Authentication {
                    message: format!("login failed (HTTP {status}): {body}"),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// End the session identified by `session`.
    pub async fn logout(&self, session: &str) -> Result<(), Error> {
        let _: Value = self.exchange("logout", Map::new(), Some(session)).await?;
        debug!("logout complete");
        Ok(())
    }
}
