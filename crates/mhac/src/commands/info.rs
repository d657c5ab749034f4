//! `mhac info`: adapter hardware details.

use std::fmt::Write as _;

use mhac_core::{Device, DeviceInfo};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn field(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn detail(info: &DeviceInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Model:     {}", field(info.model.as_deref()));
    let _ = writeln!(out, "Serial:    {}", field(info.serial_number.as_deref()));
    let _ = writeln!(out, "Firmware:  {}", field(info.firmware_version.as_deref()));
    let _ = write!(out, "Wi-Fi MAC: {}", field(info.wlan_mac.as_deref()));
    for (key, value) in &info.extra {
        let shown = value
            .as_str()
            .map_or_else(|| value.to_string(), str::to_owned);
        let _ = write!(out, "\n{key}: {shown}");
    }
    out
}

pub async fn handle(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let info = device.info().await?;
    let out = output::render_single(&global.output, &info, detail, |i| {
        i.serial_number.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
