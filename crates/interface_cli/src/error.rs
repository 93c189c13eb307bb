//! CLI error handling

use std::path::PathBuf;

use domain_calculator::CatalogError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?}: {source}")]
    InvalidInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Section '{section}' not found in schema '{schema}'")]
    SectionNotFound { schema: String, section: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
