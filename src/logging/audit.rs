//! Audit records for failed vault operations
//!
//! Emitted on the `passkeep::audit` target so they can be routed or
//! filtered apart from ordinary diagnostics. Secrets are never passed in;
//! identifiers are sanitized before they are logged.

use super::redact::sanitize_log_message;
use crate::credentials::{CredentialError, CredentialKey, Status};
use std::fmt;
use tracing::{debug, warn};

pub const AUDIT_TARGET: &str = "passkeep::audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Retrieve,
    Store,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Retrieve => "retrieve",
            Operation::Store => "store",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log a failed operation. Misses on retrieve are routine and go out at debug.
pub fn record_failure(op: Operation, backend: &str, key: &CredentialKey, error: &CredentialError) {
    let status = error.status();
    let service = sanitize_log_message(key.service());
    let account = sanitize_log_message(key.account());

    if status == Status::NotFound {
        debug!(
            target: AUDIT_TARGET,
            operation = op.as_str(),
            backend,
            service = %service,
            account = %account,
            status = status.code(),
            "credential not found"
        );
        return;
    }

    warn!(
        target: AUDIT_TARGET,
        operation = op.as_str(),
        backend,
        service = %service,
        account = %account,
        status = status.code(),
        error = %error,
        "credential operation failed"
    );
}
