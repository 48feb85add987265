//! Platform credential vault
//!
//! Uses the `keyring` crate to reach the OS vault: Keychain on macOS,
//! Credential Manager on Windows, keyutils on Linux.

use super::{
    CredentialBackend, CredentialError, CredentialKey, Status, HEALTH_ACCOUNT, HEALTH_SERVICE,
};
use crate::logging::redact::sanitize_error_message;
use keyring::Entry;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Negative OSStatus values embedded in keychain error messages. The sign
/// must start a token, so `AES-128` is not read as `-128`.
static OS_STATUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s(:=])(-\d{3,5})\b").unwrap());

static LOCKED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\blocked\b").unwrap());

/// Credential backend backed by the platform vault
#[derive(Debug, Default)]
pub struct KeyringBackend;

impl KeyringBackend {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &CredentialKey) -> Result<Entry, CredentialError> {
        Entry::new(key.service(), key.account()).map_err(Self::map_error)
    }

    /// Map keyring errors to our error types
    fn map_error(error: keyring::Error) -> CredentialError {
        match error {
            keyring::Error::NoEntry => CredentialError::NotFound,
            keyring::Error::Ambiguous(_) => {
                CredentialError::Internal("Ambiguous keychain entry".to_string())
            }
            keyring::Error::TooLong(field, max) => {
                CredentialError::InvalidKey(format!("{} longer than {} characters", field, max))
            }
            keyring::Error::Invalid(field, reason) => {
                CredentialError::InvalidKey(format!("{}: {}", field, reason))
            }
            keyring::Error::BadEncoding(_) => {
                CredentialError::Internal("Stored credential is not valid UTF-8".to_string())
            }
            keyring::Error::NoStorageAccess(platform_err) => {
                classify_platform_message(&platform_err.to_string(), true)
            }
            keyring::Error::PlatformFailure(platform_err) => {
                classify_platform_message(&platform_err.to_string(), false)
            }
            _ => CredentialError::Internal(error.to_string()),
        }
    }
}

/// Sort a platform error message into locked / denied / unavailable.
///
/// An embedded OSStatus wins over wording; `no_access` marks errors the
/// keyring crate already flagged as "could not reach the store".
fn classify_platform_message(message: &str, no_access: bool) -> CredentialError {
    if let Some(status) = embedded_os_status(message) {
        match status {
            Status::Locked => return CredentialError::StoreLocked,
            Status::AccessDenied => return CredentialError::AccessDenied,
            Status::NotFound => return CredentialError::NotFound,
            Status::Success | Status::PlatformFailure => {}
        }
    }

    let lower = message.to_lowercase();
    if lower.contains("interaction not allowed") || LOCKED_RE.is_match(&lower) {
        CredentialError::StoreLocked
    } else if lower.contains("denied")
        || lower.contains("permission")
        || lower.contains("authorization")
    {
        CredentialError::AccessDenied
    } else if no_access {
        CredentialError::StoreUnavailable(sanitize_error_message(message))
    } else {
        CredentialError::Internal(sanitize_error_message(message))
    }
}

fn embedded_os_status(message: &str) -> Option<Status> {
    OS_STATUS_RE
        .captures_iter(message)
        .filter_map(|c| c[1].parse::<i32>().ok())
        .map(Status::from_os_status)
        .find(|s| !matches!(s, Status::PlatformFailure))
}

impl CredentialBackend for KeyringBackend {
    fn name(&self) -> &'static str {
        "keyring"
    }

    fn get_raw(&self, key: &CredentialKey) -> Result<Option<String>, CredentialError> {
        let entry = Self::entry(key)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    fn set_raw(&self, key: &CredentialKey, value: &str) -> Result<(), CredentialError> {
        let entry = Self::entry(key)?;
        entry.set_password(value).map_err(Self::map_error)?;
        debug!(
            service = key.service(),
            account = key.account(),
            "stored credential in platform vault"
        );
        Ok(())
    }

    fn delete_raw(&self, key: &CredentialKey) -> Result<(), CredentialError> {
        let entry = Self::entry(key)?;
        match entry.delete_password() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    fn probe(&self) -> Result<(), CredentialError> {
        let entry = Self::entry(&CredentialKey::new(HEALTH_SERVICE, HEALTH_ACCOUNT))?;
        match entry.get_password() {
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}
