//! `mhac watch`: print change events until Ctrl-C.

use chrono::Local;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use mhac_core::{Attribute, AttributeChange, CodecTable, Device, DeviceEvent};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct ChangeLine {
    time: String,
    attribute: Attribute,
    #[serde(skip_serializing_if = "Option::is_none")]
    old: Option<f64>,
    new: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'static str>,
}

fn render(codec: &CodecTable, change: &AttributeChange, global: &GlobalOpts) -> Result<String, CliError> {
    let line = ChangeLine {
        time: Local::now().format("%H:%M:%S").to_string(),
        attribute: change.attribute,
        old: change.old,
        new: change.new,
        label: codec.label(change.attribute, change.new),
    };

    match global.output {
        OutputFormat::Table => {
            let color = output::should_color(&global.color);
            let old = line
                .old
                .map(|v| output::muted(&format!("{} → ", output::format_value(v)), color))
                .unwrap_or_default();
            let new = match line.label {
                Some(label) => format!("{} ({label})", output::format_value(line.new)),
                None => output::format_value(line.new),
            };
            Ok(format!(
                "{}  {:<20} {old}{new}",
                line.time,
                output::accent(line.attribute.as_ref(), color),
            ))
        }
        OutputFormat::Plain => Ok(format!(
            "{}={}",
            line.attribute,
            output::format_value(line.new)
        )),
        // One JSON document per line, so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_json(&line, true)
        }
    }
}

pub async fn handle(device: &Device, args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Subscribe first so the initial full report is not missed.
    let mut events = device.subscribe();
    util::wait_for_state(device, args.wait.wait).await?;

    let mut updates = 0_usize;
    loop {
        let event = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => event,
        };

        match event {
            Ok(DeviceEvent::Changed(change)) => {
                let line = render(device.codec(), &change, global)?;
                output::print_output(&line, global.quiet);
            }
            Ok(DeviceEvent::Updated) => {
                updates += 1;
                if args.count.is_some_and(|count| updates >= count) {
                    break;
                }
            }
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "output fell behind, some changes were skipped");
            }
            Err(RecvError::Closed) => break,
        }
    }
    Ok(())
}
