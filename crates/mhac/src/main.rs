mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mhac_core::Device;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // No unit needed
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Attributes => commands::attributes::handle(&cli.global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "mhac", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let device_config = config::device_config(&cli.global)?;
            let device = Device::new(device_config)?;

            tracing::debug!(command = ?cmd, host = %device.config().host, "dispatching command");
            let result = commands::dispatch(cmd, &device, &cli.global).await;
            device.stop_synchronization().await;
            result
        }
    }
}
