//! passkeep library
//!
//! Retrieves and stores passwords in the platform credential vault, keyed
//! by service and account name. See [`credentials::CredentialAccessor`].

pub mod cli;
pub mod config;
pub mod credentials;
pub mod logging;

pub use credentials::{
    CredentialAccessor, CredentialBackend, CredentialError, CredentialKey, Password, Status,
};
