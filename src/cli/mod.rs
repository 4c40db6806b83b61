//! Command-line interface

pub mod commands;
pub mod demo;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{LogFormatArg, RunCommand, ValidateCommand};
use std::ffi::OsString;

/// Sequential step pipeline runner
#[derive(Debug, Parser, Clone)]
#[command(name = "tpdp")]
#[command(author = "tpdp Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Run sequential step pipelines defined in YAML", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, value_enum, global = true, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline
    Run(RunCommand),

    /// Validate a pipeline configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
