//! Command-line interface wiring for pt-covid-data.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod fetch;
pub mod process;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Daily COVID-19 district series for Portugal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Fetch(args) => fetch::run(args, settings),
            Commands::Process(args) => process::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download municipality records and cache them as CSV.
    Fetch(fetch::Args),
    /// Build the cleaned daily district series for a run date.
    Process(process::Args),
}
