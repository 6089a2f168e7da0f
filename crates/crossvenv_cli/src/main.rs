//! crossvenv CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Input path missing or not a venv
//! - 3: Validation failure (pairing, filename, site-packages layout)
//! - 4: Config parse error
//! - 5: Unsupported target platform

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;

use cli::Cli;
use crossvenv_core::ConvertError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INPUT_ERROR: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const CONFIG_ERROR: u8 = 4;
    pub const UNSUPPORTED_PLATFORM: u8 = 5;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let registry = crossvenv_platforms::builtin();
    debug!("Supported platforms: {:?}", registry.names());

    match crossvenv_core::convert(&cli.venv, &cli.sysconfig, &registry) {
        Ok(description) => {
            println!(
                "{} is now a {} cross venv.",
                cli.venv.display(),
                description
            );
            ExitCode::from(ExitCodes::SUCCESS)
        }
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(
            EnvFilter::from_default_env()
                .add_directive(format!("crossvenv={}", level).parse().unwrap())
                .add_directive("warn".parse().unwrap()),
        )
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Map a conversion error to its exit code.
fn categorize_error(e: &ConvertError) -> u8 {
    match e {
        ConvertError::InputNotFound(_)
        | ConvertError::NotAVenv(_)
        | ConvertError::ConfigNotFound(_) => ExitCodes::INPUT_ERROR,
        ConvertError::SitePackagesNotFound(_)
        | ConvertError::AmbiguousSitePackages(_)
        | ConvertError::ConsistencyError { .. }
        | ConvertError::MalformedConfigName(_)
        | ConvertError::MissingRequiredVar(_) => ExitCodes::VALIDATION_FAILURE,
        ConvertError::ConfigParseError { .. } => ExitCodes::CONFIG_ERROR,
        ConvertError::UnsupportedPlatform(_) => ExitCodes::UNSUPPORTED_PLATFORM,
        _ => ExitCodes::GENERAL_ERROR,
    }
}
