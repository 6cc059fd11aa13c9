//! Shared configuration for lendops tools.
//!
//! TOML profiles (one per gateway), layered loading via figment, token
//! storage backends (system keyring or a file in the data dir), and
//! translation of a profile into the gateway URL + transport settings that
//! `lendops_api::ApiClient` needs. The CLI adds flag-aware wrappers on top.

mod tokens;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use lendops_api::{ApiClient, TlsMode, TokenStore, TransportConfig};

pub use tokens::{FileTokenStore, KeyringTokenStore};

/// Keyring service name shared by every profile.
pub const KEYRING_SERVICE: &str = "lendops";

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "LENDOPS_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] lendops_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the active profile: explicit choice, else `default_profile`,
    /// else `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// Where a profile's access token is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// System keyring (macOS Keychain, Windows Credential Manager, Secret Service).
    #[default]
    Keyring,
    /// Plain file under the data directory, mode 0600 on Unix.
    File,
}

/// A named gateway profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Gateway base URL (e.g., "https://ops.example.com/api").
    pub gateway: String,

    /// Username pre-filled by `auth login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default)]
    pub token_store: TokenStorage,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(gateway: impl Into<String>) -> Self {
        Self {
            gateway: gateway.into(),
            username: None,
            token_store: TokenStorage::default(),
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path: `$LENDOPS_CONFIG`, else XDG / platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "lendops", "lendops").map_or_else(
        || fallback_dir(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding file-backed tokens.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("com", "lendops", "lendops").map_or_else(
        || fallback_dir(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn fallback_dir(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("lendops");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config layered as defaults → TOML file → `LENDOPS_*` env vars.
///
/// Nested keys use a double underscore: `LENDOPS_DEFAULTS__OUTPUT=json`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LENDOPS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring unreadable config");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile → client ────────────────────────────────────────────────

/// Everything needed to construct an `ApiClient` except the token store.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub gateway: Url,
    pub transport: TransportConfig,
}

/// Parse and validate a gateway URL.
pub fn parse_gateway(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "gateway".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "gateway".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// Build gateway + transport settings from a profile, with global defaults
/// filling whatever the profile leaves unset.
pub fn profile_to_gateway_settings(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<GatewaySettings, ConfigError> {
    let gateway = parse_gateway(&profile.gateway)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = profile
        .timeout
        .or(defaults.timeout)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    Ok(GatewaySettings {
        gateway,
        transport: TransportConfig { tls, timeout },
    })
}

/// The token store a profile is configured to use.
pub fn token_store_for(profile_name: &str, profile: &Profile) -> Arc<dyn TokenStore> {
    match profile.token_store {
        TokenStorage::Keyring => Arc::new(KeyringTokenStore::new(profile_name)),
        TokenStorage::File => Arc::new(FileTokenStore::for_profile(profile_name)),
    }
}

/// Build a ready-to-use client for a configured profile.
pub fn client_for_profile(
    profile_name: &str,
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ApiClient, ConfigError> {
    let settings = profile_to_gateway_settings(profile, defaults)?;
    let tokens = token_store_for(profile_name, profile);
    Ok(ApiClient::new(settings.gateway, tokens, &settings.transport)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(cfg, Config::default());
            assert_eq!(cfg.defaults.output, "table");
            assert_eq!(cfg.defaults.timeout, None);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "staging"

                [defaults]
                output = "json"

                [profiles.staging]
                gateway = "https://staging.example.com/api"
                username = "ops"
                token_store = "file"
                timeout = 15
                "#,
            )?;
            jail.set_env("LENDOPS_DEFAULTS__OUTPUT", "yaml");

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.default_profile.as_deref(), Some("staging"));
            assert_eq!(cfg.defaults.output, "yaml");

            let staging = cfg.profile("staging").unwrap();
            assert_eq!(staging.token_store, TokenStorage::File);
            assert_eq!(staging.username.as_deref(), Some("ops"));
            assert_eq!(staging.timeout, Some(15));
            Ok(())
        });
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::new("https://ops.example.com/"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn active_profile_resolution() {
        let mut cfg = Config::default();
        assert_eq!(cfg.active_profile_name(None), "default");
        assert_eq!(cfg.active_profile_name(Some("prod")), "prod");

        cfg.default_profile = None;
        assert_eq!(cfg.active_profile_name(None), "default");

        assert!(matches!(
            cfg.profile("missing"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn gateway_settings_apply_defaults() {
        let defaults = Defaults {
            insecure: true,
            timeout: Some(20),
            ..Defaults::default()
        };
        let profile = Profile::new("https://ops.example.com/api");

        let settings = profile_to_gateway_settings(&profile, &defaults).unwrap();
        assert_eq!(settings.gateway.as_str(), "https://ops.example.com/api");
        assert!(matches!(settings.transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(settings.transport.timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn gateway_settings_profile_overrides() {
        let profile = Profile {
            ca_cert: Some(PathBuf::from("/etc/lendops/ca.pem")),
            insecure: Some(false),
            timeout: Some(0),
            ..Profile::new("http://localhost:8080")
        };
        let defaults = Defaults {
            insecure: true,
            timeout: Some(20),
            ..Defaults::default()
        };

        let settings = profile_to_gateway_settings(&profile, &defaults).unwrap();
        assert!(matches!(settings.transport.tls, TlsMode::CustomCa(_)));
        assert_eq!(settings.transport.timeout, None);
    }

    #[test]
    fn rejects_non_http_gateway() {
        assert!(parse_gateway("ftp://ops.example.com").is_err());
        assert!(parse_gateway("not a url").is_err());
        assert!(parse_gateway("https://ops.example.com").is_ok());
    }
}
