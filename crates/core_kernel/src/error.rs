//! Core error types used across the workspace

use thiserror::Error;

/// Errors raised while building kernel values from raw JSON
#[derive(Debug, Error)]
pub enum CoreError {
    /// Answers and options must be JSON objects
    #[error("{target} must be a JSON object, got {actual}")]
    NotAnObject {
        target: &'static str,
        actual: &'static str,
    },
}

impl CoreError {
    pub fn not_an_object(target: &'static str, actual: &serde_json::Value) -> Self {
        CoreError::NotAnObject {
            target,
            actual: crate::kind_of(actual),
        }
    }
}
