//! Configuration loader.

use std::path::Path;

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "famviz.toml";

/// Loads configuration from the given path. Relative paths inside it are
/// resolved against the file's directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    validate(&config)?;
    Ok(config)
}

/// Finds and loads configuration starting from the given directory.
///
/// Walks up the directory tree until a configuration file is found. Without
/// one, the defaults apply relative to `start_dir`.
///
/// # Errors
///
/// Returns an error if a configuration file is found but cannot be parsed.
pub fn find_and_load_config_from(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    let start_dir = start_dir.as_ref();
    let mut dir = start_dir;

    loop {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return load_config(config_path);
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }

    debug!(?start_dir, "no configuration file, using defaults");
    Ok(Config {
        base_dir: start_dir.to_path_buf(),
        ..Config::default()
    })
}

/// Finds and loads configuration from the current directory or parents.
///
/// # Errors
///
/// Returns an error if a configuration file is found but cannot be parsed.
pub fn find_and_load_config() -> ConfigResult<Config> {
    let current_dir = std::env::current_dir()?;
    find_and_load_config_from(&current_dir)
}

fn validate(config: &Config) -> ConfigResult<()> {
    if config.http.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "http.timeout_secs must be greater than zero".to_string(),
        ));
    }
    for (key, url) in [
        ("remote.git_base_url", &config.remote.git_base_url),
        ("remote.raw_base_url", &config.remote.raw_base_url),
        ("remote.stats_url", &config.remote.stats_url),
        ("remote.wiki_url", &config.remote.wiki_url),
    ] {
        if url.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{key} must not be empty")));
        }
    }
    Ok(())
}
