//! Recommendation errors

use domain_rules::RuleError;
use thiserror::Error;

/// Errors that can occur while generating recommendations
///
/// `RecommendationEngine::generate_recommendations` absorbs these and returns
/// an empty list; `try_generate` exposes them.
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// A template's conditions could not be evaluated
    #[error("Conditions of recommendation '{id}' failed: {source}")]
    Condition {
        id: String,
        #[source]
        source: RuleError,
    },

    /// A template could not be parsed
    #[error("Invalid recommendation template: {0}")]
    InvalidTemplate(String),

    /// JSON conversion failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecommendationError {
    /// Creates a condition error for the given template
    pub fn condition(id: impl Into<String>, source: RuleError) -> Self {
        RecommendationError::Condition {
            id: id.into(),
            source,
        }
    }
}
