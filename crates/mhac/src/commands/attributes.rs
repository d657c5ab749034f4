//! `mhac attributes`: the sensor map, offline.

use serde::Serialize;
use tabled::Tabled;

use mhac_core::{Attribute, CodecTable, SensorDescriptor};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct AttributeEntry {
    attribute: Attribute,
    uid: u16,
    writable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<&'static str>,
}

impl From<&SensorDescriptor> for AttributeEntry {
    fn from(sensor: &SensorDescriptor) -> Self {
        Self {
            attribute: sensor.attribute,
            uid: sensor.uid,
            writable: sensor.writable,
            values: sensor.values.iter().map(|&(_, label)| label).collect(),
        }
    }
}

#[derive(Tabled)]
struct AttributeRow {
    #[tabled(rename = "Attribute")]
    attribute: String,
    #[tabled(rename = "ID")]
    uid: u16,
    #[tabled(rename = "Access")]
    access: &'static str,
    #[tabled(rename = "Values")]
    values: String,
}

impl From<&AttributeEntry> for AttributeRow {
    fn from(entry: &AttributeEntry) -> Self {
        Self {
            attribute: entry.attribute.to_string(),
            uid: entry.uid,
            access: if entry.writable { "rw" } else { "ro" },
            values: entry.values.join(", "),
        }
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let data: Vec<AttributeEntry> = CodecTable::standard()
        .descriptors()
        .map(AttributeEntry::from)
        .collect();

    let out = output::render_list(&global.output, &data, |e| AttributeRow::from(e), |e| {
        e.attribute.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
