mod cli;
mod config;
mod logging;
mod run;
mod summary;

use std::process::ExitCode;

use clap::Parser;
use feedcheck_logging::{check_error, check_info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config.with_cli(&cli),
        Err(err) => {
            eprintln!("feedcheck: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = logging::initialize(&config) {
        eprintln!("feedcheck: {err:#}");
        return ExitCode::FAILURE;
    }
    match cli.config.as_deref() {
        Some(path) if path.exists() => check_info!("Using configuration from {}", path.display()),
        Some(path) => check_info!("No configuration at {}, using defaults", path.display()),
        None => check_info!("Using default configuration"),
    }

    let summary = match run::run(&cli, &config).await {
        Ok(summary) => summary,
        Err(err) => {
            check_error!("Run aborted: {:#}", err);
            return ExitCode::FAILURE;
        }
    };
    summary.log();
    if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
