//! Command dispatch: bridges CLI args -> `Device` calls -> output formatting.

pub mod attributes;
pub mod config_cmd;
pub mod info;
pub mod set;
pub mod status;
pub mod util;
pub mod watch;

use mhac_core::Device;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a unit-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Info => info::handle(device, global).await,
        Command::Status(args) => status::handle(device, &args, global).await,
        Command::Watch(args) => watch::handle(device, &args, global).await,
        Command::Set(args) => set::handle(device, &args, global).await,
        // Handled before a device is built
        Command::Attributes | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
