use clap::Parser;
use passkeep::cli::{self, Cli, Command, ConfigCommand};
use passkeep::config;
use passkeep::credentials::{CredentialAccessor, Status};
use passkeep::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(cli::parse_exit_code(&e));
        }
    };

    let mut cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("passkeep: {}", e);
            return exit_code(Status::PlatformFailure);
        }
    };
    if let Some(backend) = cli.backend {
        cfg.backend = backend;
    }

    if let Err(e) = logging::init_logging(&cfg.logging) {
        eprintln!("passkeep: {}", e);
    }

    let accessor = CredentialAccessor::for_kind(cfg.backend);
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();

    let result = match cli.command {
        Command::Get { service, account } => {
            cli::handle_get(&accessor, &service, &account, &mut stdout, &mut stderr)
        }
        Command::Set {
            service,
            account,
            password,
        } => cli::handle_set(
            &accessor,
            &service,
            &account,
            password,
            &mut std::io::stdin().lock(),
            &mut stderr,
        ),
        Command::Delete { service, account } => {
            cli::handle_delete(&accessor, &service, &account, &mut stderr)
        }
        Command::Status => cli::handle_status(&accessor, &mut stdout),
        Command::Config(ConfigCommand::Show) => cli::handle_config_show(&cfg, &mut stdout),
        Command::Config(ConfigCommand::Path) => cli::handle_config_path(&mut stdout),
        Command::Version => cli::handle_version(&mut stdout),
    };

    match result {
        Ok(status) => exit_code(status),
        Err(e) => {
            eprintln!("passkeep: {}", e);
            exit_code(Status::PlatformFailure)
        }
    }
}

fn exit_code(status: Status) -> ExitCode {
    ExitCode::from(cli::exit_code(status))
}
