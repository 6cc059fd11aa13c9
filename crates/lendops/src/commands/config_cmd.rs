//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use lendops_config::{Config, FileTokenStore, Profile, TokenStorage};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn storage_name(storage: TokenStorage) -> &'static str {
    match storage {
        TokenStorage::Keyring => "keyring",
        TokenStorage::File => "file",
    }
}

/// Format config as TOML-ish text. Tokens never live in the file, so
/// only their location is shown.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    if let Some(timeout) = cfg.defaults.timeout {
        let _ = writeln!(out, "timeout = {timeout}");
    }

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "gateway = \"{}\"", p.gateway);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        let _ = writeln!(out, "token_store = \"{}\"", storage_name(p.token_store));
        if p.token_store == TokenStorage::File {
            let path = FileTokenStore::for_profile(name);
            let _ = writeln!(out, "# token file: {}", path.path().display());
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Record `name` as the default profile; errors if it isn't configured.
fn set_default_profile(cfg: &mut Config, name: String) -> Result<(), CliError> {
    if !cfg.profiles.contains_key(&name) {
        return Err(profile_not_found(name, cfg));
    }
    cfg.default_profile = Some(name);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            let mut cfg = config::load_config_or_default();
            eprintln!("lendops configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(global.profile.clone().unwrap_or_else(|| "default".into()))
                .interact_text()
                .map_err(prompt_err)?;

            let gateway: String = Input::new()
                .with_prompt("Gateway URL")
                .default(
                    global
                        .gateway
                        .clone()
                        .unwrap_or_else(|| "https://ops.example.com/api".into()),
                )
                .validate_with(|raw: &String| {
                    lendops_config::parse_gateway(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username (blank to ask at login)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let storage_choices = &[
                "System keyring (recommended)",
                "File in the data directory (mode 0600)",
            ];
            let token_store = match Select::new()
                .with_prompt("Where to keep the session token?")
                .items(storage_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => TokenStorage::Keyring,
                _ => TokenStorage::File,
            };

            let mut profile = Profile::new(gateway);
            profile.username = Some(username).filter(|u| !u.trim().is_empty());
            profile.token_store = token_store;
            if global.insecure {
                profile.insecure = Some(true);
            }

            let replaced = cfg.profiles.insert(profile_name.clone(), profile).is_some();
            let has_default = cfg
                .default_profile
                .as_ref()
                .is_some_and(|d| cfg.profiles.contains_key(d));
            if !has_default {
                cfg.default_profile = Some(profile_name.clone());
            }
            save_config(&cfg)?;

            let verb = if replaced { "updated" } else { "added" };
            eprintln!("\n✓ Profile '{profile_name}' {verb} in {}", config_path.display());
            eprintln!("  Sign in with: lendops -p {profile_name} auth login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(global.format(), &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: lendops config init");
                return Ok(());
            }
            let default = cfg.active_profile_name(None);
            let mut names: Vec<_> = cfg.profiles.keys().collect();
            names.sort();
            for name in names {
                let marker = if *name == default { " *" } else { "" };
                println!("{name}{marker}");
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            set_default_profile(&mut cfg, name.clone())?;
            save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        let mut prod = Profile::new("https://ops.example.com/api");
        prod.username = Some("ops".into());
        cfg.profiles.insert("prod".into(), prod);
        let mut dev = Profile::new("http://localhost:8080");
        dev.token_store = TokenStorage::File;
        dev.insecure = Some(true);
        cfg.profiles.insert("dev".into(), dev);
        cfg
    }

    #[test]
    fn format_lists_profiles_sorted() {
        let text = format_config(&sample());
        let dev = text.find("[profiles.dev]");
        let prod = text.find("[profiles.prod]");
        assert!(dev.is_some() && prod.is_some());
        assert!(dev < prod, "{text}");
        assert!(text.contains("username = \"ops\""));
        assert!(text.contains("token_store = \"file\""));
        assert!(text.contains("# token file:"));
    }

    #[test]
    fn use_rejects_unknown_profile() {
        let mut cfg = sample();
        let err = set_default_profile(&mut cfg, "staging".into()).unwrap_err();
        match err {
            CliError::ProfileNotFound { available, .. } => assert_eq!(available, "dev, prod"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    }

    #[test]
    fn use_sets_default() {
        let mut cfg = sample();
        assert!(set_default_profile(&mut cfg, "dev".into()).is_ok());
        assert_eq!(cfg.default_profile.as_deref(), Some("dev"));
    }
}
