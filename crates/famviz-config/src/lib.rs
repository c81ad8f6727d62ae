//! Configuration management for the family visualizer scraper.
//!
//! This crate handles loading and validating the optional `famviz.toml`
//! configuration file and the `families.json` language groups.

mod error;
mod families;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use families::{Families, load_families};
pub use loader::{CONFIG_FILE_NAME, find_and_load_config, find_and_load_config_from, load_config};
pub use schema::{Config, HttpConfig, PathsConfig, RemoteConfig};
