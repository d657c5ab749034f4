// ── Session manager ──
//
// Holds the session id issued by `login`. At most one session is held
// at a time; a failed login leaves the manager unauthenticated.

use secrecy::SecretString;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::transport::DeviceTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionState {
    Unauthenticated,
    Authenticated { token: String },
}

pub(crate) struct SessionManager {
    username: String,
    password: SecretString,
    state: SessionState,
}

impl SessionManager {
    pub(crate) fn new(username: String, password: SecretString) -> Self {
        Self {
            username,
            password,
            state: SessionState::Unauthenticated,
        }
    }

    pub(crate) fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token } => Some(token),
            SessionState::Unauthenticated => None,
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Drop any held session and obtain a fresh one.
    pub(crate) async fn login<T: DeviceTransport>(
        &mut self,
        transport: &T,
    ) -> Result<String, CoreError> {
        self.state = SessionState::Unauthenticated;
        debug!(username = %self.username, "requesting session id");

        let token = transport.login(&self.username, &self.password).await?;
        if token.is_empty() {
            return Err(CoreError::AuthenticationFailed {
                message: "device returned an empty session id".into(),
            });
        }

        self.state = SessionState::Authenticated {
            token: token.clone(),
        };
        Ok(token)
    }

    /// End the held session, if any. Failures are logged and otherwise
    /// ignored; the manager is unauthenticated afterwards either way.
    pub(crate) async fn logout<T: DeviceTransport>(&mut self, transport: &T) {
        let state = std::mem::replace(&mut self.state, SessionState::Unauthenticated);
        if let SessionState::Authenticated { token } = state {
            if let Err(e) = transport.logout(&token).await {
                warn!(error = %e, "logout failed");
            }
        }
    }

    /// Forget the session without telling the device.
    pub(crate) fn invalidate(&mut self) {
        self.state = SessionState::Unauthenticated;
    }
}
