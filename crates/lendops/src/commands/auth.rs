//! Auth command handlers.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::SecretString;

use lendops_api::UserProfile;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn resolve_username(flag: Option<String>, session: &Session) -> Result<String, CliError> {
    if let Some(username) = flag.or_else(|| session.username.clone()) {
        return Ok(username);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "pass --username or set username in the profile".into(),
        });
    }
    Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)
}

fn resolve_password(password_env: Option<&str>) -> Result<SecretString, CliError> {
    let password = match password_env {
        Some(var) => std::env::var(var).map_err(|_| CliError::Validation {
            field: "password-env".into(),
            reason: format!("environment variable {var} is not set"),
        })?,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

fn user_detail(user: &UserProfile) -> String {
    output::detail(&[
        ("ID", user.id.clone()),
        ("Username", user.username.clone()),
        ("Name", user.full_name.clone().unwrap_or_default()),
        ("Email", user.email.clone().unwrap_or_default()),
        ("Roles", user.roles.join(", ")),
        ("Branch", user.branch_id.clone().unwrap_or_default()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = &session.client;
    match args.command {
        AuthCommand::Login {
            username,
            password_env,
        } => {
            let username = resolve_username(username, session)?;
            let password = resolve_password(password_env.as_deref())?;

            let auth = client.login(&username, &password).await?;
            let who = auth
                .user
                .as_ref()
                .and_then(|u| u.full_name.clone())
                .unwrap_or(username);
            output::print_done(
                &format!("Signed in as {who} (profile '{}')", session.profile_name),
                global.quiet,
            );
            Ok(())
        }

        AuthCommand::Logout => {
            client.logout().await?;
            output::print_done("Signed out", global.quiet);
            Ok(())
        }

        AuthCommand::Whoami => {
            let user = client.current_user().await?;
            let out = output::render_single(global.format(), &user, user_detail, |u| {
                u.username.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
