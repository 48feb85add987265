//! Credential accessor
//!
//! The facade callers use to read and write passwords. Every call is an
//! independent request to the backend; nothing is cached except the result
//! of the availability probe.

use super::{
    BackendKind, CredentialBackend, CredentialError, CredentialKey, DisabledBackend,
    KeyringBackend, MemoryBackend, Password,
};
use crate::logging::audit::{self, Operation};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default)]
struct Availability {
    available: AtomicBool,
    checked: AtomicBool,
}

/// Retrieves and stores passwords keyed by `(service, account)`.
#[derive(Clone)]
pub struct CredentialAccessor {
    backend: Arc<dyn CredentialBackend>,
    availability: Arc<Availability>,
}

impl std::fmt::Debug for CredentialAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialAccessor")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl CredentialAccessor {
    pub fn new(backend: impl CredentialBackend + 'static) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<dyn CredentialBackend>) -> Self {
        Self {
            backend,
            availability: Arc::new(Availability::default()),
        }
    }

    /// Build an accessor for the configured backend.
    pub fn for_kind(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Keyring => Self::new(KeyringBackend::new()),
            BackendKind::Memory => Self::new(MemoryBackend::new()),
            BackendKind::Disabled => Self::new(DisabledBackend),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Fetch the password stored for `(service, account)`.
    ///
    /// An entry holding an empty string is returned as an empty password.
    pub fn retrieve(&self, service: &str, account: &str) -> Result<Password, CredentialError> {
        let key = CredentialKey::new(service, account);
        let result = key.validate().and_then(|()| {
            self.backend
                .get_raw(&key)?
                .map(Password::from)
                .ok_or(CredentialError::NotFound)
        });
        self.audit(Operation::Retrieve, &key, result)
    }

    /// Persist `password` for `(service, account)`, replacing any previous entry.
    pub fn store(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<(), CredentialError> {
        let key = CredentialKey::new(service, account);
        let result = key
            .validate()
            .and_then(|()| self.backend.set_raw(&key, password));
        self.audit(Operation::Store, &key, result)
    }

    /// Remove the entry for `(service, account)`. Deleting a missing entry succeeds.
    pub fn delete(&self, service: &str, account: &str) -> Result<(), CredentialError> {
        let key = CredentialKey::new(service, account);
        let result = key
            .validate()
            .and_then(|()| self.backend.delete_raw(&key));
        self.audit(Operation::Delete, &key, result)
    }

    /// Whether the vault can be reached. Probed once, then cached.
    pub fn is_available(&self) -> bool {
        if self.availability.checked.load(Ordering::Acquire) {
            return self.availability.available.load(Ordering::Acquire);
        }

        let available = match self.backend.probe() {
            Ok(()) => true,
            Err(err) => !matches!(
                err,
                CredentialError::StoreLocked | CredentialError::StoreUnavailable(_)
            ),
        };
        debug!(backend = self.backend.name(), available, "probed credential store");

        self.availability.available.store(available, Ordering::Release);
        self.availability.checked.store(true, Ordering::Release);
        available
    }

    /// [`retrieve`](Self::retrieve) on the blocking thread pool.
    pub async fn retrieve_async(
        &self,
        service: &str,
        account: &str,
    ) -> Result<Password, CredentialError> {
        let this = self.clone();
        let (service, account) = (service.to_string(), account.to_string());
        run_blocking(move || this.retrieve(&service, &account)).await
    }

    /// [`store`](Self::store) on the blocking thread pool.
    pub async fn store_async(
        &self,
        service: &str,
        account: &str,
        password: Password,
    ) -> Result<(), CredentialError> {
        let this = self.clone();
        let (service, account) = (service.to_string(), account.to_string());
        run_blocking(move || this.store(&service, &account, password.expose())).await
    }

    /// [`delete`](Self::delete) on the blocking thread pool.
    pub async fn delete_async(&self, service: &str, account: &str) -> Result<(), CredentialError> {
        let this = self.clone();
        let (service, account) = (service.to_string(), account.to_string());
        run_blocking(move || this.delete(&service, &account)).await
    }

    fn audit<T>(
        &self,
        op: Operation,
        key: &CredentialKey,
        result: Result<T, CredentialError>,
    ) -> Result<T, CredentialError> {
        if let Err(err) = &result {
            audit::record_failure(op, self.backend.name(), key, err);
        }
        result
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, CredentialError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(CredentialError::Internal(format!(
            "Credential task failed: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Status;

    fn accessor_with(backend: Arc<MemoryBackend>) -> CredentialAccessor {
        CredentialAccessor::from_arc(backend)
    }

    #[test]
    fn test_store_then_retrieve() {
        let accessor = CredentialAccessor::new(MemoryBackend::new());
        accessor.store("example.com", "alice", "s3cr3t").unwrap();

        let password = accessor.retrieve("example.com", "alice").unwrap();
        assert_eq!(password.expose(), "s3cr3t");
    }

    #[test]
    fn test_retrieve_unknown_is_not_found() {
        let accessor = CredentialAccessor::new(MemoryBackend::new());
        let err = accessor.retrieve("unknown.com", "nobody").unwrap_err();
        assert_eq!(err.status(), Status::NotFound);
    }

    #[test]
    fn test_empty_key_never_reaches_backend() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_fault(Some(CredentialError::StoreLocked));
        let accessor = accessor_with(backend);

        assert!(matches!(
            accessor.retrieve("", "alice"),
            Err(CredentialError::InvalidKey(_))
        ));
        assert!(matches!(
            accessor.store("example.com", "", "x"),
            Err(CredentialError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_empty_password_round_trips() {
        let backend = Arc::new(MemoryBackend::new());
        let accessor = accessor_with(backend.clone());

        accessor.store("ftp.example.com", "anonymous", "").unwrap();
        assert_eq!(backend.len(), 1);

        let password = accessor.retrieve("ftp.example.com", "anonymous").unwrap();
        assert!(password.is_empty());
    }

    #[test]
    fn test_stored_empty_value_is_not_missing() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set_raw(&CredentialKey::new("example.com", "alice"), "")
            .unwrap();
        let accessor = accessor_with(backend);

        assert_eq!(
            accessor.retrieve("example.com", "alice").unwrap(),
            Password::from("")
        );
        assert_eq!(
            accessor.retrieve("example.com", "bob").unwrap_err(),
            CredentialError::NotFound
        );
    }

    #[test]
    fn test_locked_store_reports_locked() {
        let backend = Arc::new(MemoryBackend::new());
        let accessor = accessor_with(backend.clone());
        accessor.store("example.com", "alice", "s3cr3t").unwrap();

        backend.set_fault(Some(CredentialError::StoreLocked));
        let err = accessor.retrieve("example.com", "alice").unwrap_err();
        assert_eq!(err.status(), Status::Locked);
    }

    #[test]
    fn test_availability_is_cached() {
        let backend = Arc::new(MemoryBackend::new());
        let accessor = accessor_with(backend.clone());

        assert!(accessor.is_available());
        backend.set_fault(Some(CredentialError::StoreUnavailable("gone".into())));
        assert!(accessor.is_available());

        let fresh = accessor_with(backend);
        assert!(!fresh.is_available());
    }

    #[test]
    fn test_denied_probe_still_counts_as_available() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_fault(Some(CredentialError::AccessDenied));
        assert!(accessor_with(backend).is_available());
    }

    #[test]
    fn test_for_kind_selects_backend() {
        for (kind, name) in [
            (BackendKind::Keyring, "keyring"),
            (BackendKind::Memory, "memory"),
            (BackendKind::Disabled, "disabled"),
        ] {
            assert_eq!(CredentialAccessor::for_kind(kind).backend_name(), name);
        }
    }

    #[tokio::test]
    async fn test_async_roundtrip() {
        let accessor = CredentialAccessor::new(MemoryBackend::new());
        accessor
            .store_async("example.com", "alice", Password::from("s3cr3t"))
            .await
            .unwrap();

        let password = accessor.retrieve_async("example.com", "alice").await.unwrap();
        assert_eq!(password, Password::from("s3cr3t"));

        accessor.delete_async("example.com", "alice").await.unwrap();
        assert_eq!(
            accessor.retrieve_async("example.com", "alice").await.unwrap_err(),
            CredentialError::NotFound
        );
    }
}
