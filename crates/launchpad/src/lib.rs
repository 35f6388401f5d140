//! Command line entrypoint.

use anyhow::Result;
use args::{Args, CommandExecutor};
use clap::Parser;
use launchpad_config::Config;
use launchpad_logging::configure_logging;
use shadow_rs::shadow;
use tracing::info;

pub(crate) mod args;
mod commands;
mod config_validator;
#[cfg(test)]
mod testutils;

shadow!(build);

/// One-line build description.
pub fn get_version_data() -> String {
    format!(
        "{} {} ({} @ {})",
        build::PROJECT_NAME,
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::COMMIT_DATE_3339
    )
}

/// Parse the command line, then run the requested command.
pub fn initialize_command_line() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = Config::from_env(build::PKG_VERSION.to_string());
    configure_logging(&config)?;
    config_validator::validate_configuration(&config, args.starts_server())?;

    info!(version = %get_version_data(), "Starting launchpad");
    CommandExecutor::parse_args(config, args)
}
