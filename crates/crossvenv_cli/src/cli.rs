//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Convert a native virtual environment into a cross-platform virtual
/// environment.
#[derive(Parser)]
#[command(name = "crossvenv")]
#[command(version, about = "Convert a native virtual environment into a cross-platform virtual environment")]
pub struct Cli {
    /// The path to the sysconfig JSON document for the target platform
    #[arg(long, value_name = "FILE")]
    pub sysconfig: PathBuf,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// The location of the native virtual environment
    pub venv: PathBuf,
}
