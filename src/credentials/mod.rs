//! Credential storage module
//!
//! Retrieves and stores passwords in a credential vault keyed by
//! `(service, account)`. The vault itself is external; this module only
//! bridges to it through [`CredentialBackend`]:
//! - [`KeyringBackend`]: the platform vault (macOS Keychain, Windows
//!   Credential Manager, Linux keyutils)
//! - [`MemoryBackend`]: in-process map, used by tests and dry runs
//! - [`DisabledBackend`]: stores nothing, finds nothing

mod accessor;
mod disabled;
mod memory;
mod platform;
mod status;

pub use accessor::CredentialAccessor;
pub use disabled::DisabledBackend;
pub use memory::MemoryBackend;
pub use platform::KeyringBackend;
pub use status::Status;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

/// Service name used by availability probes.
pub const HEALTH_SERVICE: &str = "passkeep-health";

/// Account name used by availability probes.
pub const HEALTH_ACCOUNT: &str = "_check";

/// Errors reported by credential operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Credential not found")]
    NotFound,

    #[error("Access to the credential store was denied")]
    AccessDenied,

    #[error("Credential store is locked")]
    StoreLocked,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid credential key: {0}")]
    InvalidKey(String),

    #[error("Invalid credential value: {0}")]
    InvalidValue(String),

    #[error("Internal credential store error: {0}")]
    Internal(String),
}

impl CredentialError {
    /// Status code reported to callers for this error.
    pub fn status(&self) -> Status {
        match self {
            CredentialError::NotFound => Status::NotFound,
            CredentialError::AccessDenied => Status::AccessDenied,
            CredentialError::StoreLocked => Status::Locked,
            CredentialError::StoreUnavailable(_)
            | CredentialError::InvalidKey(_)
            | CredentialError::InvalidValue(_)
            | CredentialError::Internal(_) => Status::PlatformFailure,
        }
    }
}

/// Identifies a credential entry in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey {
    service: String,
    account: String,
}

impl CredentialKey {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Reject keys the vault could never match.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.service.trim().is_empty() {
            return Err(CredentialError::InvalidKey(
                "service must not be empty".to_string(),
            ));
        }
        if self.account.trim().is_empty() {
            return Err(CredentialError::InvalidKey(
                "account must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.account)
    }
}

/// A secret retrieved from or handed to the vault.
///
/// The buffer is wiped when dropped and never shows up in `Debug` output.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the plaintext.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Password {}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(Zeroizing::new(value))
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The vault capability the accessor consumes.
///
/// Implementations are blocking; a call may sit behind an OS authorization
/// prompt for as long as the user takes to answer it.
pub trait CredentialBackend: Send + Sync {
    /// Short name used in logs and `status` output.
    fn name(&self) -> &'static str;

    /// Find the secret stored for `key`. `Ok(None)` when there is no entry.
    fn get_raw(&self, key: &CredentialKey) -> Result<Option<String>, CredentialError>;

    /// Store `value` for `key`, replacing any existing entry.
    fn set_raw(&self, key: &CredentialKey, value: &str) -> Result<(), CredentialError>;

    /// Remove the entry for `key`. Missing entries are not an error.
    fn delete_raw(&self, key: &CredentialKey) -> Result<(), CredentialError>;

    /// Touch the vault without needing a real entry.
    fn probe(&self) -> Result<(), CredentialError>;
}

/// Which vault a [`CredentialAccessor`] talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Keyring,
    Memory,
    Disabled,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Keyring => "keyring",
            BackendKind::Memory => "memory",
            BackendKind::Disabled => "disabled",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" => Ok(BackendKind::Keyring),
            "memory" => Ok(BackendKind::Memory),
            "disabled" => Ok(BackendKind::Disabled),
            other => Err(format!("unknown credential backend: {other}")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
