//! Shared helpers for command handlers.

use std::str::FromStr;
use std::time::Duration;

use strum::IntoEnumIterator;

use mhac_core::{Attribute, Device, Reader};

use crate::error::CliError;

/// Start synchronizing and wait until the first complete read lands.
pub async fn wait_for_state(device: &Device, wait_secs: u64) -> Result<Reader, CliError> {
    let mut snapshots = device.snapshot_stream();
    device.start_synchronization().await?;

    let first_valid = async {
        while !snapshots.current().is_valid() {
            if snapshots.changed().await.is_none() {
                break;
            }
        }
    };

    tokio::time::timeout(Duration::from_secs(wait_secs), first_valid)
        .await
        .map_err(|_| CliError::NoState {
            host: device.config().host.clone(),
            seconds: wait_secs,
        })?;

    let state = device.get();
    if state.valid() {
        Ok(state)
    } else {
        Err(CliError::NoState {
            host: device.config().host.clone(),
            seconds: wait_secs,
        })
    }
}

/// Parse an attribute name, ignoring case and `-` / `_` separators.
pub fn parse_attribute(name: &str) -> Result<Attribute, CliError> {
    if let Ok(attribute) = Attribute::from_str(name) {
        return Ok(attribute);
    }
    let wanted = squash(name);
    Attribute::iter()
        .find(|attribute| squash(attribute.as_ref()) == wanted)
        .ok_or_else(|| CliError::UnknownAttribute { name: name.into() })
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
