use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;

use crate::error::Error;

/// Where the bearer token lives between calls.
///
/// The request layer calls [`load`](Self::load) on every request, so a
/// token saved by `login` in one place is picked up everywhere else without
/// rebuilding the client. Returning `None` means no `Authorization` header
/// is sent.
pub trait TokenStore: Send + Sync {
    /// Read the current token, if any.
    fn load(&self) -> Option<SecretString>;

    /// Replace the stored token.
    fn save(&self, token: SecretString) -> Result<(), Error>;

    /// Remove the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), Error>;
}

/// Process-local token store.
///
/// Used for one-shot tokens passed on the command line and in tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with `token`.
    pub fn with_token(token: impl Into<SecretString>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: SecretString) -> Result<(), Error> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
