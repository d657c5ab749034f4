//! Clap derive structures for the `mhac` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mhac -- control Intesis MH-AC-WIFI-1 climate units
#[derive(Debug, Parser)]
#[command(
    name = "mhac",
    version,
    about = "Control MH-AC-WIFI-1 climate units from the command line",
    long_about = "Talks to the Intesis MH-AC-WIFI-1 Wi-Fi adapter over its local\n\
        /api.cgi interface: read the unit's state, follow changes, and send\n\
        set requests with the same debounce and retry rules as the driver.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Unit profile to use
    #[arg(long, short = 'p', env = "MHAC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Unit address (overrides profile)
    #[arg(long, short = 'H', env = "MHAC_HOST", global = true)]
    pub host: Option<String>,

    /// Login user (overrides profile)
    #[arg(long, short = 'u', env = "MHAC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "MHAC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Config file location
    #[arg(long, env = "MHAC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MHAC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MHAC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show model, serial number, and firmware of the adapter
    Info,

    /// Read the unit once and print every attribute
    #[command(alias = "st")]
    Status(WaitArgs),

    /// Follow attribute changes until interrupted
    Watch(WatchArgs),

    /// Set one attribute (e.g. `mhac set mode cool`, `mhac set setpoint 22.5`)
    Set(SetArgs),

    /// List the attributes the unit exposes
    #[command(alias = "attrs")]
    Attributes,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Device commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WaitArgs {
    /// Seconds to wait for the first complete read
    #[arg(long, short = 'w', default_value = "15")]
    pub wait: u64,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub wait: WaitArgs,

    /// Exit after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Attribute name (`fanSpeed`, `fan-speed` and `fan_speed` are equivalent)
    pub attribute: String,

    /// Numeric value or label (`on`, `cool`, `swing`, ...)
    pub value: String,

    #[command(flatten)]
    pub wait: WaitArgs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the current configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (host, username, password_env, min_setpoint, ...)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
