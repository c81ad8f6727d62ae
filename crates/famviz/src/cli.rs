//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use famviz_core::ScrapeOptions;

use crate::scrape;

/// How much progress is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Progress messages.
    #[default]
    Normal,
    /// Progress plus every revision that could not be counted.
    Verbose,
}

impl Verbosity {
    /// Builds the verbosity from the `--quiet` and `--verbose` flags.
    /// Quiet wins.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    /// Returns the default log filter directive.
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

/// Scrape the data necessary for the visualizer of the specified family.
#[derive(Debug, Parser)]
#[command(name = "famviz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Family to scrape from (case-insensitive)
    pub family: String,

    /// Faster mode, doesn't dig through histories
    #[arg(short, long)]
    pub shallow: bool,

    /// Output committers that aren't in the shared .mailmap
    #[arg(short = 'u', long = "update-mailmap", alias = "updatemailmap")]
    pub update_mailmap: bool,

    /// Stop logging status updates
    #[arg(short, long)]
    pub quiet: bool,

    /// Log the commits whose stems could not be counted
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file [default: famviz.toml in the current directory or a parent]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Returns the logging verbosity selected by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Returns the scrape options selected by the flags.
    pub fn options(&self) -> ScrapeOptions {
        ScrapeOptions {
            shallow: self.shallow,
            audit_mailmap: self.update_mailmap,
        }
    }

    /// Runs the scrape.
    pub fn run(self) -> Result<()> {
        scrape::run(&self)
    }
}
