//! Credential backend for when persistence is turned off
//!
//! Writes are dropped and lookups always miss.

use super::{CredentialBackend, CredentialError, CredentialKey};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBackend;

impl CredentialBackend for DisabledBackend {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn get_raw(&self, _key: &CredentialKey) -> Result<Option<String>, CredentialError> {
        Ok(None)
    }

    fn set_raw(&self, key: &CredentialKey, _value: &str) -> Result<(), CredentialError> {
        debug!(
            service = key.service(),
            account = key.account(),
            "credential storage disabled; dropping write"
        );
        Ok(())
    }

    fn delete_raw(&self, _key: &CredentialKey) -> Result<(), CredentialError> {
        Ok(())
    }

    fn probe(&self) -> Result<(), CredentialError> {
        Ok(())
    }
}
