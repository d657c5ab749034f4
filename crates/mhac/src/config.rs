//! CLI configuration -- thin wrapper around `mhac_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--host,
//! --username, --password, --timeout, --config).

use std::path::PathBuf;

use secrecy::SecretString;

use mhac_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use mhac_config::{Config, Profile};

/// Config file in effect: `--config` / `MHAC_CONFIG`, else the platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(mhac_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(mhac_config::load_config(&config_file(global))?)
}

pub fn save(global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    Ok(mhac_config::save_config(cfg, &config_file(global))?)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `DeviceConfig` for device-bound commands.
///
/// Flags win over the profile. Without a matching profile, `--host` and
/// a password from `--password` / `MHAC_PASSWORD` are enough.
pub fn device_config(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let cfg = load(global)?;
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => cfg.profile(&profile_name)?.clone(),
        None => Profile {
            host: global.host.clone().ok_or_else(|| CliError::NoConfig {
                path: config_file(global).display().to_string(),
            })?,
            username: "admin".into(),
            ..Profile::default()
        },
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username.clone_from(username);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let password = match global.password {
        Some(ref password) => SecretString::from(password.clone()),
        None => mhac_config::resolve_password(&profile, &profile_name)?,
    };

    Ok(mhac_config::device_config(&profile, &cfg.defaults, password)?)
}
