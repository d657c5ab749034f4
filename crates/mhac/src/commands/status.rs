//! `mhac status`: one synchronization pass, every attribute printed.

use serde::Serialize;
use tabled::Tabled;

use mhac_core::{Attribute, CodecTable, Device, Snapshot};

use crate::cli::{GlobalOpts, WaitArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Rows ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StatusEntry {
    attribute: Attribute,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'static str>,
    writable: bool,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Attribute")]
    attribute: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Access")]
    access: &'static str,
}

impl From<&StatusEntry> for StatusRow {
    fn from(entry: &StatusEntry) -> Self {
        let value = match entry.label {
            Some(label) => format!("{label} ({})", output::format_value(entry.value)),
            None => output::format_value(entry.value),
        };
        Self {
            attribute: entry.attribute.to_string(),
            value,
            access: if entry.writable { "rw" } else { "ro" },
        }
    }
}

fn entries(codec: &CodecTable, snapshot: &Snapshot) -> Vec<StatusEntry> {
    snapshot
        .iter()
        .map(|(attribute, value)| StatusEntry {
            attribute,
            value,
            label: codec.label(attribute, value),
            writable: codec.is_writable(attribute),
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(device: &Device, args: &WaitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let state = util::wait_for_state(device, args.wait).await?;

    let mut data = entries(device.codec(), state.snapshot());
    data.sort_by_key(|entry| entry.attribute);

    let out = output::render_list(&global.output, &data, |e| StatusRow::from(e), |e| {
        format!("{}={}", e.attribute, output::format_value(e.value))
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
