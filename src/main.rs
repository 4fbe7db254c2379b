//! Rebranch CLI entrypoint for default-branch migration.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use rebranch::{
    BranchMigration, ConfigError, OctocrabRepositoryGateway, RebranchConfig, TerminalGate,
};
use tracing_subscriber::EnvFilter;

use cli::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Initialises structured logging on stderr, honouring `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rebranch=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<ExitCode, CliError> {
    let config = load_config()?;

    let locator = config.locator()?;
    let token = config.resolve_token()?;
    let migration = config.migration()?;

    let gateway = OctocrabRepositoryGateway::for_token(&token, &locator)?;
    let gate = TerminalGate::new(migration.force());

    let report = BranchMigration::new(&gateway, &gate, &locator, &migration)
        .run()
        .await;

    cli::write_report(&report)?;
    if report.is_completed() && migration.execute() {
        cli::write_follow_up(migration.old_branch(), migration.new_branch())?;
    }

    Ok(cli::exit_code(&report))
}

/// Loads configuration from CLI arguments, environment, and files.
///
/// # Errors
///
/// Returns [`ConfigError::Load`] when ortho-config fails to parse arguments
/// or load configuration files.
fn load_config() -> Result<RebranchConfig, CliError> {
    RebranchConfig::load()
        .map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
        .map_err(CliError::from)
}
