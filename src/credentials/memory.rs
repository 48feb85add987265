//! In-memory credential vault
//!
//! Last write wins. A fault can be injected so callers can exercise the
//! locked / denied paths without a real vault.

use super::{CredentialBackend, CredentialError, CredentialKey};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use zeroize::Zeroizing;

#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<CredentialKey, Zeroizing<String>>>,
    fault: Mutex<Option<CredentialError>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `error` until cleared with `None`.
    pub fn set_fault(&self, error: Option<CredentialError>) {
        *lock(&self.fault) = error;
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_fault(&self) -> Result<(), CredentialError> {
        match lock(&self.fault).as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

// A panic while holding the lock leaves the map itself intact.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CredentialBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get_raw(&self, key: &CredentialKey) -> Result<Option<String>, CredentialError> {
        self.check_fault()?;
        Ok(lock(&self.entries).get(key).map(|v| v.to_string()))
    }

    fn set_raw(&self, key: &CredentialKey, value: &str) -> Result<(), CredentialError> {
        self.check_fault()?;
        lock(&self.entries).insert(key.clone(), Zeroizing::new(value.to_string()));
        Ok(())
    }

    fn delete_raw(&self, key: &CredentialKey) -> Result<(), CredentialError> {
        self.check_fault()?;
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn probe(&self) -> Result<(), CredentialError> {
        self.check_fault()
    }
}
