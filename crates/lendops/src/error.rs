//! CLI error types with miette diagnostics.
//!
//! Maps `lendops_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code.

use miette::Diagnostic;
use thiserror::Error;

use lendops_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the gateway: {message}")]
    #[diagnostic(
        code(lendops::connection_failed),
        help(
            "Check the gateway URL and your network.\n\
             Current profile gateway can be inspected with: lendops config show"
        )
    )]
    ConnectionFailed { message: String },

    #[error("Could not set up TLS: {message}")]
    #[diagnostic(
        code(lendops::tls_error),
        help("Use --insecure (-k) for self-signed gateways, or configure ca_cert in your profile.")
    )]
    Tls { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(lendops::auth_failed),
        help("Sign in again with: lendops auth login --profile {profile}")
    )]
    AuthFailed { profile: String, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(lendops::forbidden),
        help("Your account lacks the role required for this operation.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(lendops::not_found))]
    NotFound { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(lendops::api_error), help("The service answered HTTP {status}."))]
    Api { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(
        code(lendops::rejected),
        help("The service refused the request (HTTP {status}). Check the submitted values.")
    )]
    Rejected { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(code(lendops::empty_response))]
    EmptyResponse { message: String },

    #[error("Token storage failed: {message}")]
    #[diagnostic(
        code(lendops::token_store),
        help("Set token_store = \"file\" in the profile if no system keyring is available.")
    )]
    TokenStore { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lendops::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lendops::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lendops config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No gateway configured")]
    #[diagnostic(
        code(lendops::no_config),
        help(
            "Create a profile with: lendops config init\n\
             Or pass --gateway / set LENDOPS_GATEWAY.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(lendops::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(lendops::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(lendops::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to authentication failures.
    pub fn for_profile(self, profile: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: profile.into(),
                message,
            },
            other => other,
        }
    }
}

// ── lendops_api::Error → CliError mapping ───────────────────────────

impl From<lendops_api::Error> for CliError {
    fn from(err: lendops_api::Error) -> Self {
        use lendops_api::Error;

        match err {
            Error::Transport { message } => Self::ConnectionFailed { message },
            Error::Status { status, message } => match status {
                401 => Self::AuthFailed {
                    profile: "default".into(),
                    message,
                },
                403 => Self::Forbidden { message },
                404 => Self::NotFound { message },
                400 | 409 | 422 => Self::Rejected { status, message },
                _ => Self::Api { status, message },
            },
            Error::MissingData { message, .. } => Self::EmptyResponse { message },
            Error::InvalidUrl(e) => Self::Validation {
                field: "gateway".into(),
                reason: e.to_string(),
            },
            Error::InvalidPathSegment(segment) => Self::Validation {
                field: "identifier".into(),
                reason: format!("{segment:?} is not a usable identifier"),
            },
            Error::InvalidHeader { name, reason } => Self::Validation {
                field: name,
                reason,
            },
            Error::TokenStore(message) => Self::TokenStore { message },
            Error::Tls(message) => Self::Tls { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Client(e) => e.into(),
            other => Self::Config(Box::new(other)),
        }
    }
}
