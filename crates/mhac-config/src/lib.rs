//! Shared configuration for mhac tools.
//!
//! TOML profiles (one per climate unit), password resolution (env +
//! keyring + plaintext), and translation to `mhac_core::DeviceConfig`.
//! The CLI adds `GlobalOpts`-aware overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mhac_core::DeviceConfig;

/// Keyring service name under which passwords are stored.
pub const KEYRING_SERVICE: &str = "mhac";

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "MHAC_CONFIG";

/// Environment variable consulted for the password when the profile
/// names no variable of its own.
pub const PASSWORD_ENV: &str = "MHAC_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named units.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poll period in milliseconds.
    #[serde(default = "default_sync_period_ms")]
    pub sync_period_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            sync_period_ms: default_sync_period_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    5
}
fn default_sync_period_ms() -> u64 {
    1000
}

/// One climate unit.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Address of the Wi-Fi adapter (e.g. "192.168.1.40").
    pub host: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password. Prefer the keyring or an env var.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Lowest setpoint the unit may be asked for, °C (raised to 18 if lower).
    pub min_setpoint: Option<f64>,

    /// Highest setpoint the unit may be asked for, °C (lowered to 30 if higher).
    pub max_setpoint: Option<f64>,

    /// Override poll period, milliseconds.
    pub sync_period_ms: Option<u64>,

    /// Bulk reads slower than this are logged, milliseconds.
    pub slow_threshold_ms: Option<u64>,

    /// Override timeout, seconds.
    pub timeout: Option<u64>,
}

fn default_username() -> String {
    "admin".into()
}

impl Config {
    /// Look up a profile, listing the known names on failure.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profiles.keys().cloned().collect(),
            })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `MHAC_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("io", "mhac", "mhac").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mhac");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config at `path`, merged with `MHAC_` environment variables.
/// A missing file yields the defaults.
///
/// Environment keys use `__` to descend: `MHAC_DEFAULTS__TIMEOUT=10`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MHAC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store `password` in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(password.expose_secret())?;
    Ok(())
}

/// Resolve the password for a profile.
///
/// 1. the variable named by `password_env`
/// 2. `MHAC_PASSWORD`
/// 3. the system keyring
/// 4. plaintext `password` in the profile
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_from(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        |user| {
            keyring::Entry::new(KEYRING_SERVICE, user)
                .and_then(|entry| entry.get_password())
                .ok()
        },
    )
}

fn resolve_password_from(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    if let Some(value) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(value));
    }

    if let Some(value) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(value));
    }

    if let Some(value) = keyring(&keyring_user(profile_name)) {
        return Ok(SecretString::from(value));
    }

    if let Some(ref value) = profile.password {
        return Ok(SecretString::from(value.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `DeviceConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_device_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DeviceConfig, ConfigError> {
    let password = resolve_password(profile, profile_name)?;
    device_config(profile, defaults, password)
}

/// Build a `DeviceConfig` from a profile and an already resolved password.
pub fn device_config(
    profile: &Profile,
    defaults: &Defaults,
    password: SecretString,
) -> Result<DeviceConfig, ConfigError> {
    let host = profile.host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let mut cfg = DeviceConfig::new(host, profile.username.clone(), password)
        .with_timeout(Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)))
        .with_sync_period(Duration::from_millis(
            profile.sync_period_ms.unwrap_or(defaults.sync_period_ms),
        ));

    if let Some(ms) = profile.slow_threshold_ms {
        cfg = cfg.with_slow_threshold(Duration::from_millis(ms));
    }

    let min = profile.min_setpoint.unwrap_or(cfg.min_setpoint);
    let max = profile.max_setpoint.unwrap_or(cfg.max_setpoint);
    if min > max {
        return Err(ConfigError::Validation {
            field: "min_setpoint".into(),
            reason: format!("{min} is above max_setpoint {max}"),
        });
    }
    Ok(cfg.with_setpoint_range(min, max))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        Profile {
            host: "192.168.1.40".into(),
            username: "admin".into(),
            ..Profile::default()
        }
    }

    fn no_keyring(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn loads_profiles_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
default_profile = "living-room"

[defaults]
timeout = 3

[profiles.living-room]
host = "192.168.1.40"
password = "secret"
min_setpoint = 19.5
sync_period_ms = 2000

[profiles.bedroom]
host = "aircon-bedroom.lan"
username = "installer"
"#
        )
        .unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("living-room"));
        assert_eq!(cfg.defaults.timeout, 3);
        assert_eq!(cfg.defaults.output, "table");

        let living = cfg.profile("living-room").unwrap();
        assert_eq!(living.username, "admin");
        assert_eq!(living.min_setpoint, Some(19.5));

        let bedroom = cfg.profile("bedroom").unwrap();
        assert_eq!(bedroom.username, "installer");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.sync_period_ms, 1000);
    }

    #[test]
    fn unknown_profile_lists_available() {
        let mut cfg = Config::default();
        cfg.profiles.insert("office".into(), profile());

        match cfg.profile("garage") {
            Err(ConfigError::ProfileNotFound { name, available }) => {
                assert_eq!(name, "garage");
                assert_eq!(available, vec!["office".to_owned()]);
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert("office".into(), profile());
        save_config(&cfg, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.profile("office").unwrap().host, "192.168.1.40");
    }

    #[test]
    fn password_env_wins_over_everything() {
        let mut p = profile();
        p.password_env = Some("OFFICE_PW".into());
        p.password = Some("plaintext".into());

        let env = |name: &str| match name {
            "OFFICE_PW" => Some("from-profile-env".into()),
            PASSWORD_ENV => Some("from-global-env".into()),
            _ => None,
        };
        let secret =
            resolve_password_from(&p, "office", env, |_| Some("from-keyring".into())).unwrap();
        assert_eq!(secret.expose_secret(), "from-profile-env");
    }

    #[test]
    fn keyring_then_plaintext() {
        let mut p = profile();
        p.password = Some("plaintext".into());

        let secret = resolve_password_from(&p, "office", |_| None, |user| {
            (user == "office/password").then(|| "from-keyring".into())
        })
        .unwrap();
        assert_eq!(secret.expose_secret(), "from-keyring");

        let secret = resolve_password_from(&p, "office", |_| None, no_keyring).unwrap();
        assert_eq!(secret.expose_secret(), "plaintext");
    }

    #[test]
    fn no_password_anywhere() {
        let result = resolve_password_from(&profile(), "office", |_| None, no_keyring);
        assert!(matches!(result, Err(ConfigError::NoCredentials { .. })));
    }

    #[test]
    fn device_config_from_profile() {
        let mut p = profile();
        p.max_setpoint = Some(26.0);
        p.sync_period_ms = Some(3000);
        p.slow_threshold_ms = Some(800);

        let cfg =
            device_config(&p, &Defaults::default(), SecretString::from("pw".to_owned()))
                .unwrap();
        assert_eq!(cfg.host, "192.168.1.40");
        assert_eq!(cfg.min_setpoint, 18.0);
        assert_eq!(cfg.max_setpoint, 26.0);
        assert_eq!(cfg.sync_period, Duration::from_secs(3));
        assert_eq!(cfg.slow_threshold, Duration::from_millis(800));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn inverted_setpoint_range_is_rejected() {
        let mut p = profile();
        p.min_setpoint = Some(27.0);
        p.max_setpoint = Some(21.0);
        let result =
            device_config(&p, &Defaults::default(), SecretString::from("pw".to_owned()));
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn empty_host_is_rejected() {
        let p = Profile::default();
        let result =
            device_config(&p, &Defaults::default(), SecretString::from("pw".to_owned()));
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}
