use thiserror::Error;

/// Top-level error type for the `lendops-api` crate.
///
/// The first three variants are produced by the domain services when a
/// [`ResponseEnvelope`](crate::ResponseEnvelope) carries no usable data.
/// Their `Display` is the bare message so that it can be shown to an
/// operator verbatim. The remaining variants cover client construction.
#[derive(Debug, Error)]
pub enum Error {
    // ── Request outcomes ────────────────────────────────────────────
    /// No response was received (connection refused, DNS failure, timeout).
    #[error("{message}")]
    Transport { message: String },

    /// The service answered with a non-2xx status.
    ///
    /// `message` is the body's `message` field when present, otherwise
    /// `"Request failed with status <code>"`.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The service answered 2xx but the body held nothing usable.
    /// `message` is the operation's fixed fallback text.
    #[error("{message}")]
    MissingData { status: u16, message: String },

    // ── Construction ────────────────────────────────────────────────
    /// URL parsing or joining error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An identifier that cannot stand as a single URL path segment.
    #[error("Invalid path segment {0:?}: identifiers must not be empty, '.' or '..'")]
    InvalidPathSegment(String),

    /// A header value could not be encoded.
    #[error("Invalid value for header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The token store could not be read or written.
    #[error("Token storage error: {0}")]
    TokenStore(String),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// Build the error for a failed envelope: status 0 is a transport fault,
    /// anything else came back from the service.
    pub(crate) fn from_failure(status: u16, message: String) -> Self {
        if status == 0 {
            Self::Transport { message }
        } else {
            Self::Status { status, message }
        }
    }

    /// The HTTP status behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::MissingData { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if no response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` for a 404 from the service.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Returns `true` if the stored token was rejected (401).
    ///
    /// Logging in again usually resolves it.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}
