//! famviz CLI - Scrape the data of a language family for the family visualizer.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod scrape;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Bare messages: progress lines are meant for the operator
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.verbosity().directive())),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
