//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `get <service> <account>` -- print a stored password
//! - `set <service> <account>` -- store a password (read from stdin by default)
//! - `delete <service> <account>` -- remove a stored password
//! - `status` -- report the configured backend and whether it is reachable
//! - `config show|path` -- inspect configuration
//! - `version` -- print build/version info
//!
//! Handlers return the [`Status`] of the vault operation; `main` turns it
//! into the process exit code. Codes 0..=4 are vault statuses only; a bad
//! command line exits with [`USAGE_EXIT_CODE`].

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};

use crate::config::{self, Config};
use crate::credentials::{BackendKind, CredentialAccessor, CredentialError, Status};

/// Retrieve and store passwords in the platform credential vault.
#[derive(Parser, Debug)]
#[command(
    name = "passkeep",
    version = env!("CARGO_PKG_VERSION"),
    about = "passkeep: read and write passwords in the platform credential vault"
)]
pub struct Cli {
    /// Credential backend to use (overrides config and PASSKEEP_BACKEND).
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the password stored for a service and account.
    Get {
        service: String,
        account: String,
    },

    /// Store a password for a service and account, replacing any existing one.
    Set {
        service: String,
        account: String,

        /// Password to store. Read from the first line of stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },

    /// Remove the password stored for a service and account.
    Delete {
        service: String,
        account: String,
    },

    /// Report the configured backend and whether the vault is reachable.
    Status,

    /// Inspect configuration.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version, build date, and git commit information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON.
    Show,

    /// Print the resolved configuration file path.
    Path,
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

type HandlerResult = Result<Status, Box<dyn std::error::Error>>;

/// Exit code for command-line usage errors (sysexits `EX_USAGE`).
pub const USAGE_EXIT_CODE: u8 = 64;

/// Process exit code for a vault status.
pub fn exit_code(status: Status) -> u8 {
    if status.is_success() {
        0
    } else {
        status.code() as u8
    }
}

/// Process exit code for a failed argument parse. `--help` and `--version`
/// are reported through clap's error type but are not failures.
pub fn parse_exit_code(error: &clap::Error) -> u8 {
    if error.use_stderr() {
        USAGE_EXIT_CODE
    } else {
        0
    }
}

/// Run the `get` subcommand.
pub fn handle_get(
    accessor: &CredentialAccessor,
    service: &str,
    account: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> HandlerResult {
    match accessor.retrieve(service, account) {
        Ok(password) => {
            writeln!(out, "{}", password.expose())?;
            Ok(Status::Success)
        }
        Err(e) => report(err, e),
    }
}

/// Run the `set` subcommand.
pub fn handle_set(
    accessor: &CredentialAccessor,
    service: &str,
    account: &str,
    password: Option<String>,
    input: &mut impl BufRead,
    err: &mut impl Write,
) -> HandlerResult {
    let password = match password {
        Some(p) => zeroize::Zeroizing::new(p),
        None => {
            let mut line = zeroize::Zeroizing::new(String::new());
            input.read_line(&mut line)?;
            let trimmed = line.trim_end_matches(['\r', '\n']).len();
            line.truncate(trimmed);
            // An empty first line is almost always a stray Enter, not an intended password.
            if line.is_empty() {
                return report(
                    err,
                    CredentialError::InvalidValue(
                        "no password on stdin; pass --password \"\" to store an empty one"
                            .to_string(),
                    ),
                );
            }
            line
        }
    };

    match accessor.store(service, account, &password) {
        Ok(()) => Ok(Status::Success),
        Err(e) => report(err, e),
    }
}

/// Run the `delete` subcommand.
pub fn handle_delete(
    accessor: &CredentialAccessor,
    service: &str,
    account: &str,
    err: &mut impl Write,
) -> HandlerResult {
    match accessor.delete(service, account) {
        Ok(()) => Ok(Status::Success),
        Err(e) => report(err, e),
    }
}

/// Run the `status` subcommand.
pub fn handle_status(accessor: &CredentialAccessor, out: &mut impl Write) -> HandlerResult {
    let available = accessor.is_available();
    writeln!(out, "passkeep status")?;
    writeln!(out, "===============")?;
    writeln!(out, "  Backend:    {}", accessor.backend_name())?;
    writeln!(
        out,
        "  Available:  {}",
        if available { "yes" } else { "no" }
    )?;
    Ok(if available {
        Status::Success
    } else {
        Status::PlatformFailure
    })
}

/// Run the `config show` subcommand.
pub fn handle_config_show(cfg: &Config, out: &mut impl Write) -> HandlerResult {
    writeln!(out, "{}", serde_json::to_string_pretty(cfg)?)?;
    Ok(Status::Success)
}

/// Run the `config path` subcommand.
pub fn handle_config_path(out: &mut impl Write) -> HandlerResult {
    writeln!(out, "{}", config::get_config_path().display())?;
    Ok(Status::Success)
}

/// Run the `version` subcommand.
pub fn handle_version(out: &mut impl Write) -> HandlerResult {
    writeln!(out, "passkeep {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "  commit:     {}", env!("PASSKEEP_GIT_HASH"))?;
    writeln!(out, "  built:      {}", env!("PASSKEEP_BUILD_DATE"))?;
    Ok(Status::Success)
}

fn report(err: &mut impl Write, error: CredentialError) -> HandlerResult {
    writeln!(err, "passkeep: {}", error)?;
    Ok(error.status())
}
