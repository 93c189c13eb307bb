//! Rule evaluation errors
//!
//! These errors never escape the public engine entry points. A failing rule
//! is recorded as a diagnostic and skipped; only failures outside any single
//! rule surface to the calculator, which folds them into its result.

use thiserror::Error;

/// Errors that can occur while evaluating a rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// A rule referenced a function that is not registered
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A question referenced a validator that is not registered
    #[error("Unknown validator: {0}")]
    UnknownValidator(String),

    /// A registered function returned an error
    #[error("Function '{name}' failed: {message}")]
    FunctionFailed {
        name: String,
        message: String,
    },

    /// A value that must be numeric was not
    #[error("Expected a number for {context}, got {actual}")]
    NotNumeric {
        context: String,
        actual: String,
    },

    /// A rule produced output of the wrong shape
    #[error("Invalid rule output: {0}")]
    InvalidOutput(String),

    /// Generic evaluation failure raised by computed functions
    #[error("Evaluation error: {0}")]
    Evaluation(String),
}

impl RuleError {
    /// Creates an evaluation error, typically from inside a computed function
    pub fn evaluation(message: impl Into<String>) -> Self {
        RuleError::Evaluation(message.into())
    }

    /// Creates a not-numeric error describing where the number was expected
    pub fn not_numeric(context: impl Into<String>, actual: &serde_json::Value) -> Self {
        RuleError::NotNumeric {
            context: context.into(),
            actual: actual.to_string(),
        }
    }

    /// Creates an invalid output error
    pub fn invalid_output(message: impl Into<String>) -> Self {
        RuleError::InvalidOutput(message.into())
    }
}
