//! The scrape command.

use anyhow::{Context, Result};
use tracing::debug;

use famviz_config::{Config, find_and_load_config, load_config, load_families};
use famviz_core::{Scraper, Sources};
use famviz_counter::CounterSet;
use famviz_counter_dix::DixCounter;
use famviz_counter_lexc::LexcCounter;

use crate::cli::Cli;

/// Scrapes the family named on the command line.
pub fn run(cli: &Cli) -> Result<()> {
    let config = load(cli)?;
    let families = load_families(config.families()).context("failed to load the families file")?;
    let languages = families.languages(&cli.family)?.to_vec();
    debug!(family = %cli.family, ?languages, "scraping family");

    let sources = Sources::from_config(&config)?;
    let scraper = Scraper::new(
        &config,
        &cli.family,
        languages,
        counters(),
        cli.options(),
        sources,
    )?;

    // Network calls are awaited one at a time
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create async runtime")?;
    let report = rt.block_on(scraper.run())?;

    debug!(
        pairs = report.pairs,
        transducers = report.transducers,
        histories = report.histories,
        "scrape finished"
    );

    for committer in &report.unmapped {
        println!("{} {}", committer.line, committer.language);
    }

    // Printed even in quiet mode
    println!("\nSuccessfully scraped data for {} languages!", scraper.title());
    Ok(())
}

fn load(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => find_and_load_config().context("failed to load configuration"),
    }
}

/// The counters for every dictionary format.
fn counters() -> CounterSet {
    CounterSet::new()
        .with_counter(Box::new(LexcCounter::new()))
        .with_counter(Box::new(DixCounter::new()))
}
