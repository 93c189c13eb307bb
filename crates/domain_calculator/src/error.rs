//! Calculator and catalog errors

use std::path::PathBuf;

use domain_rules::{Category, RuleError};
use thiserror::Error;

/// Failures that abort a calculation
///
/// These never escape `CalculatorEngine::calculate_results`; the message is
/// stored in `Results::error` next to the partial results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    /// A category could not be evaluated as a whole
    #[error("Failed to evaluate {category}: {source}")]
    Category {
        category: Category,
        #[source]
        source: RuleError,
    },

    /// The tier resolved to something other than a whole, non-negative number
    #[error("Invalid tier: {0}")]
    InvalidTier(String),

    /// Base price plus additional costs exceeds the decimal range
    #[error("Total price is out of range")]
    Overflow,
}

impl CalculatorError {
    pub fn category(category: Category, source: RuleError) -> Self {
        CalculatorError::Category { category, source }
    }
}

/// Errors raised while loading schemas
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A schema document could not be parsed
    #[error("Failed to parse schema {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A schema file or directory could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No schema is registered under the id
    #[error("Schema not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    pub fn parse(origin: impl Into<String>, source: serde_json::Error) -> Self {
        CatalogError::Parse {
            origin: origin.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}
