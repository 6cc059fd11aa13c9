// Persistent token stores: system keyring and plain file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use lendops_api::{Error, TokenStore};

use crate::{KEYRING_SERVICE, data_dir};

fn token_key(profile_name: &str) -> String {
    format!("{profile_name}/access-token")
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Token kept in the OS keyring under `lendops` / `<profile>/access-token`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    key: String,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            key: token_key(profile_name),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, Error> {
        keyring::Entry::new(KEYRING_SERVICE, &self.key)
            .map_err(|e| Error::TokenStore(format!("keyring unavailable: {e}")))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<SecretString> {
        let entry = self.entry().ok()?;
        match entry.get_password() {
            Ok(secret) => Some(SecretString::from(secret)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                debug!(key = %self.key, error = %e, "keyring read failed");
                None
            }
        }
    }

    fn save(&self, token: SecretString) -> Result<(), Error> {
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| Error::TokenStore(format!("failed to store token in keyring: {e}")))
    }

    fn clear(&self) -> Result<(), Error> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Error::TokenStore(format!(
                "failed to remove token from keyring: {e}"
            ))),
        }
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Token kept in a file, for hosts without a usable keyring.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/<profile>.token`
    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(data_dir().join(format!("{profile_name}.token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<SecretString> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| SecretString::from(token.to_owned()))
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %e, "token file unreadable");
                }
                None
            }
        }
    }

    fn save(&self, token: SecretString) -> Result<(), Error> {
        let io_err = |e: std::io::Error| {
            Error::TokenStore(format!("failed to write {}: {e}", self.path.display()))
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, token.expose_secret()).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::TokenStore(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}
