use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{InfluxcliError, Result};
use crate::tabulator::TabulateOptions;
use crate::timestamp::TimePrecision;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub connection: ConnectionConfig,
}

/// How results are shown.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub pretty: bool,
    pub precision: TimePrecision,
}

/// Connection defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub database: Option<String>,
}

impl Config {
    /// Display settings to pass into each tabulation call.
    pub fn tabulate_options(&self) -> TabulateOptions {
        TabulateOptions::new(self.display.pretty, self.display.precision)
    }
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| InfluxcliError::Config(e.to_string()))
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = influxcli::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// `<config dir>/influxcli/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("influxcli").join("config.toml"))
}
