//! Accessor behaviour against the in-memory vault
//!
//! Covers the round-trip, not-found, overwrite and failure-status
//! guarantees callers rely on, without touching a real OS vault.

use passkeep::credentials::{DisabledBackend, MemoryBackend};
use passkeep::{CredentialAccessor, CredentialError, Status};
use std::sync::Arc;

fn vault() -> (Arc<MemoryBackend>, CredentialAccessor) {
    let backend = Arc::new(MemoryBackend::new());
    let accessor = CredentialAccessor::from_arc(backend.clone());
    (backend, accessor)
}

#[test]
fn store_then_retrieve_returns_stored_password() {
    let (_, accessor) = vault();
    accessor.store("example.com", "alice", "s3cr3t").unwrap();

    let password = accessor.retrieve("example.com", "alice").unwrap();
    assert_eq!(password.expose(), "s3cr3t");
}

#[test]
fn retrieve_unknown_entry_is_not_found() {
    let (_, accessor) = vault();
    let err = accessor.retrieve("unknown.com", "nobody").unwrap_err();
    assert_eq!(err, CredentialError::NotFound);
    assert_eq!(err.status(), Status::NotFound);
}

#[test]
fn empty_password_round_trips() {
    let (backend, accessor) = vault();
    accessor.store("ftp.example.com", "anonymous", "").unwrap();
    assert_eq!(backend.len(), 1);

    let password = accessor.retrieve("ftp.example.com", "anonymous").unwrap();
    assert_eq!(password.expose(), "");
}

#[test]
fn second_store_wins() {
    let (_, accessor) = vault();
    accessor.store("example.com", "alice", "first").unwrap();
    accessor.store("example.com", "alice", "second").unwrap();

    assert_eq!(
        accessor.retrieve("example.com", "alice").unwrap().expose(),
        "second"
    );
}

#[test]
fn many_keys_round_trip_independently() {
    let (backend, accessor) = vault();
    let keys = [
        ("example.com", "alice", "a-pass"),
        ("example.com", "bob", "b-pass"),
        ("ftp.example.org", "alice", "ftp-pass"),
        ("sftp://host:22", "root", "root pass with spaces"),
    ];
    for (service, account, password) in keys {
        accessor.store(service, account, password).unwrap();
    }
    assert_eq!(backend.len(), keys.len());

    for (service, account, password) in keys {
        assert_eq!(accessor.retrieve(service, account).unwrap().expose(), password);
    }
}

#[test]
fn delete_is_idempotent() {
    let (_, accessor) = vault();
    accessor.store("example.com", "alice", "s3cr3t").unwrap();

    accessor.delete("example.com", "alice").unwrap();
    accessor.delete("example.com", "alice").unwrap();

    assert_eq!(
        accessor.retrieve("example.com", "alice").unwrap_err().status(),
        Status::NotFound
    );
}

#[test]
fn denied_and_locked_vaults_surface_their_status() {
    let (backend, accessor) = vault();
    accessor.store("example.com", "alice", "s3cr3t").unwrap();

    backend.set_fault(Some(CredentialError::AccessDenied));
    assert_eq!(
        accessor.retrieve("example.com", "alice").unwrap_err().status(),
        Status::AccessDenied
    );
    assert_eq!(
        accessor.store("example.com", "alice", "other").unwrap_err().status(),
        Status::AccessDenied
    );

    backend.set_fault(Some(CredentialError::StoreLocked));
    assert_eq!(
        accessor.retrieve("example.com", "alice").unwrap_err().status(),
        Status::Locked
    );

    // The rejected write must not have replaced the stored value.
    backend.set_fault(None);
    assert_eq!(
        accessor.retrieve("example.com", "alice").unwrap().expose(),
        "s3cr3t"
    );
}

#[test]
fn disabled_vault_never_returns_a_secret() {
    let accessor = CredentialAccessor::new(DisabledBackend);
    accessor.store("example.com", "alice", "s3cr3t").unwrap();
    assert_eq!(
        accessor.retrieve("example.com", "alice").unwrap_err(),
        CredentialError::NotFound
    );
    assert!(accessor.is_available());
}

#[test]
fn accessor_is_shareable_across_threads() {
    let (backend, accessor) = vault();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let accessor = accessor.clone();
            std::thread::spawn(move || {
                let account = format!("user{i}");
                accessor.store("example.com", &account, &format!("pw{i}")).unwrap();
                accessor.retrieve("example.com", &account).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().expose(), format!("pw{i}"));
    }
    assert_eq!(backend.len(), 8);
}

#[tokio::test]
async fn async_variants_match_blocking_ones() {
    let (_, accessor) = vault();
    accessor
        .store_async("example.com", "alice", "s3cr3t".into())
        .await
        .unwrap();
    assert_eq!(
        accessor.retrieve("example.com", "alice").unwrap().expose(),
        "s3cr3t"
    );
    assert_eq!(
        accessor
            .retrieve_async("unknown.com", "nobody")
            .await
            .unwrap_err()
            .status(),
        Status::NotFound
    );
}
