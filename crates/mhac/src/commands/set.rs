//! `mhac set <attribute> <value>`.

use mhac_core::{Attribute, CodecTable, Device, SetOutcome};

use crate::cli::{GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// Numbers pass through; anything else is looked up as a label of the
/// attribute (`cool`, `high`, `swing`), with `true`/`false`/`yes`/`no`
/// accepted for on/off attributes.
fn parse_value(codec: &CodecTable, attribute: Attribute, raw: &str) -> Result<f64, CliError> {
    if let Ok(value) = raw.trim().parse::<f64>() {
        return Ok(value);
    }
    let label = match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => "on".to_owned(),
        "false" | "no" => "off".to_owned(),
        other => other.to_owned(),
    };
    Ok(codec.value_for_label(attribute, &label)?)
}

pub async fn handle(device: &Device, args: &SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let attribute = util::parse_attribute(&args.attribute)?;
    let value = parse_value(device.codec(), attribute, &args.value)?;

    // Reject bad requests before touching the network.
    device.codec().encode(attribute, value)?;

    let before = util::wait_for_state(device, args.wait.wait).await?;
    let previous = before.value(attribute).ok();

    match device.set_attribute(attribute, value).await? {
        SetOutcome::Applied { attempts } => {
            tracing::info!(%attribute, value, attempts, "set applied");
            if !global.quiet {
                let color = output::should_color(&global.color);
                let from = previous
                    .map(|v| format!(" (was {})", output::format_value(v)))
                    .unwrap_or_default();
                let line = format!("✓ {attribute} set to {}{from}", output::format_value(value));
                eprintln!("{}", output::success(&line, color));
            }
            Ok(())
        }
        SetOutcome::Superseded => {
            if !global.quiet {
                eprintln!("{attribute}: request replaced by a newer one");
            }
            Ok(())
        }
        SetOutcome::Exhausted { attempts } => Err(CliError::Rejected {
            message: format!("{attribute} was not applied after {attempts} attempts"),
        }),
    }
}
