//! CLI configuration: thin wrapper around `lendops_config` shared types.
//!
//! Adds the resolution that respects `GlobalOpts` flag overrides
//! (--gateway, --token, --insecure, --timeout).

use std::sync::Arc;

use clap::ValueEnum;
use secrecy::SecretString;

use lendops_api::{ApiClient, MemoryTokenStore, TokenStore};
use lendops_config::{Config, Profile};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use lendops_config::{config_path, load_config_or_default, save_config};

/// A client bound to the profile it was built from.
pub struct Session {
    pub client: ApiClient,
    pub profile_name: String,
    /// Username remembered in the profile, offered by `auth login`.
    pub username: Option<String>,
}

/// Fill output/color from config defaults when no flag or env var set them.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = OutputFormat::from_str(&cfg.defaults.output, true).ok();
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&cfg.defaults.color, true).ok();
    }
}

/// Pick the profile for this invocation and apply flag overrides to it.
///
/// Without a matching profile a `--gateway` flag alone is enough.
pub fn resolve_profile(global: &GlobalOpts, cfg: &Config) -> Result<(String, Profile), CliError> {
    let name = cfg.active_profile_name(global.profile.as_deref());

    let mut profile = match (cfg.profiles.get(&name), &global.gateway) {
        (Some(profile), _) => profile.clone(),
        (None, Some(gateway)) => Profile::new(gateway.clone()),
        (None, None) if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref gateway) = global.gateway {
        profile.gateway.clone_from(gateway);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok((name, profile))
}

/// Build an `ApiClient` from config + flags.
///
/// `--token` swaps the profile's persistent store for an in-memory one.
pub fn build_session(global: &GlobalOpts, cfg: &Config) -> Result<Session, CliError> {
    let (profile_name, profile) = resolve_profile(global, cfg)?;
    let settings = lendops_config::profile_to_gateway_settings(&profile, &cfg.defaults)?;

    let tokens: Arc<dyn TokenStore> = match global.token {
        Some(ref token) => Arc::new(MemoryTokenStore::with_token(SecretString::from(
            token.clone(),
        ))),
        None => lendops_config::token_store_for(&profile_name, &profile),
    };

    tracing::debug!(profile = %profile_name, gateway = %settings.gateway, "using gateway");
    let client = ApiClient::new(settings.gateway, tokens, &settings.transport)?;
    Ok(Session {
        client,
        profile_name,
        username: profile.username,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["lendops"];
        argv.extend_from_slice(args);
        argv.push("completions");
        argv.push("bash");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, gateway: &str) -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(name.into(), Profile::new(gateway));
        cfg
    }

    #[test]
    fn gateway_flag_works_without_profile() {
        let (name, profile) = resolve_profile(
            &global(&["--gateway", "https://ops.example.com"]),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.gateway, "https://ops.example.com");
    }

    #[test]
    fn missing_config_is_a_usage_error() {
        let err = resolve_profile(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn unknown_explicit_profile_lists_available() {
        let cfg = config_with("prod", "https://ops.example.com");
        let err = resolve_profile(&global(&["--profile", "staging"]), &cfg).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "staging");
                assert_eq!(available, "prod");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with("default", "https://ops.example.com");
        let (_, profile) = resolve_profile(
            &global(&["-g", "http://localhost:9000", "-k", "--timeout", "5"]),
            &cfg,
        )
        .unwrap();
        assert_eq!(profile.gateway, "http://localhost:9000");
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn output_defaults_from_config() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();

        let mut opts = global(&[]);
        apply_defaults(&mut opts, &cfg);
        assert_eq!(opts.format(), OutputFormat::Yaml);

        let mut opts = global(&["-o", "json"]);
        apply_defaults(&mut opts, &cfg);
        assert_eq!(opts.format(), OutputFormat::Json);
    }
}
