// ── Command dispatch ──
//
// One debounced write: encode, write with retries, record the acknowledged
// value, wait for the unit to settle, then run a change pass.

use serde::Serialize;
use tokio::time;
use tracing::{debug, error, warn};

use super::Synchronizer;
use crate::error::CoreError;
use crate::model::Attribute;
use crate::transport::DeviceTransport;

/// How a set request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SetOutcome {
    /// The unit acknowledged the write.
    Applied { attempts: u32 },
    /// A later request for the same attribute replaced this one before it
    /// was sent.
    Superseded,
    /// Every attempt failed. The snapshot keeps its previous value.
    Exhausted { attempts: u32 },
}

impl SetOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

impl<T: DeviceTransport> Synchronizer<T> {
    pub(super) async fn dispatch(&mut self, attribute: Attribute, value: f64) -> SetOutcome {
        let (uid, raw) = match self.codec.encode(attribute, value) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(%attribute, value, error = %e, "cannot encode value");
                return SetOutcome::Exhausted { attempts: 0 };
            }
        };

        let max_attempts = self.config.timing.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            debug!(%attribute, uid, raw, attempt, "setting {attribute} to {value}");
            match self.write_once(uid, raw).await {
                Ok(()) => {
                    self.store.set(attribute, value);
                    self.feeds.publish_snapshot(self.store.current());
                    time::sleep(self.config.timing.settle_delay).await;
                    self.detect_and_notify().await;
                    return SetOutcome::Applied { attempts: attempt };
                }
                Err(e) => {
                    warn!(%attribute, value, attempt, error = %e, "unable to set state");
                    if attempt < max_attempts {
                        time::sleep(self.config.timing.retry_backoff).await;
                    }
                }
            }
        }

        error!(%attribute, value, attempts = max_attempts, "giving up on set request");
        SetOutcome::Exhausted {
            attempts: max_attempts,
        }
    }

    /// One write attempt, logging in first when no session is held.
    async fn write_once(&mut self, uid: u16, raw: i64) -> Result<(), CoreError> {
        let token = self.ensure_session().await?;
        self.transport.write(&token, uid, raw).await?;
        Ok(())
    }
}
