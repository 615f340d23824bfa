//! API key lookup: environment first, then the system keyring.

use keyring::Entry;
use std::error::Error;
use std::fmt;
use tracing::debug;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const KEYRING_SERVICE: &str = "chatskin";
const KEYRING_USER: &str = "gemini";

/// Describes failures when attempting to access the system keyring.
///
/// Recoverable errors mean the backend was temporarily unavailable (a locked
/// keychain, no secret service running). Permanent errors carry the
/// underlying cause for the user.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CredentialStore {
    use_keyring: bool,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self { use_keyring: true }
    }

    pub fn new_with_keyring(use_keyring: bool) -> Self {
        Self { use_keyring }
    }

    /// Resolve the API key, reading `GEMINI_API_KEY` before the keyring.
    /// `Ok(None)` means no key is configured anywhere.
    pub fn resolve_api_key(&self) -> Result<Option<String>, KeyringAccessError> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        if let Some(key) = non_empty(from_env) {
            debug!(source = "env", "API key resolved");
            return Ok(Some(key));
        }
        let stored = self.get_key()?;
        if stored.is_some() {
            debug!(source = "keyring", "API key resolved");
        }
        Ok(non_empty(stored))
    }

    pub fn get_key(&self) -> Result<Option<String>, KeyringAccessError> {
        if !self.use_keyring {
            return Ok(None);
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        match entry.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn set_key(&self, key: &str) -> Result<(), KeyringAccessError> {
        if !self.use_keyring {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        entry.set_password(key)?;
        Ok(())
    }

    /// Returns whether a stored key was removed.
    pub fn remove_key(&self) -> Result<bool, KeyringAccessError> {
        if !self.use_keyring {
            return Ok(false);
        }
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
