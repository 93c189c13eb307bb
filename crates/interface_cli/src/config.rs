//! CLI configuration

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// CLI configuration
///
/// Every field can be set through a `QUOTE_`-prefixed environment variable
/// and overridden by the matching command-line flag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Directory of extra schema files loaded next to the bundled ones
    pub schema_dir: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    /// Default cap for `recommend`
    pub max_recommendations: Option<usize>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema_dir: None,
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            max_recommendations: None,
        }
    }
}

impl CliConfig {
    /// Loads configuration from `QUOTE_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix("QUOTE"))
    }

    /// Loads configuration from an environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
