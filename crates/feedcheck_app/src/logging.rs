//! Logger initialization for the feedcheck binary.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::{CheckConfig, LogDestination};

/// Initialize the global logger from the run configuration.
///
/// For `LogDestination::File` or `Both`, creates the configured log file.
pub fn initialize(config: &CheckConfig) -> anyhow::Result<()> {
    let level = LevelFilter::from_str(&config.log_level)
        .with_context(|| format!("unknown log level {:?}", config.log_level))?;
    let log_config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match config.log_destination {
        LogDestination::File => vec![create_file_logger(level, log_config, &config.log_file)?],
        LogDestination::Terminal => vec![terminal_logger(level, log_config)],
        LogDestination::Both => vec![
            terminal_logger(level, log_config.clone()),
            create_file_logger(level, log_config, &config.log_file)?,
        ],
    };

    CombinedLogger::init(loggers).context("installing logger")
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    path: &Path,
) -> anyhow::Result<Box<WriteLogger<File>>> {
    let file =
        File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    Ok(WriteLogger::new(level, config, file))
}
