//! Function Registry
//!
//! Schemas are plain data, so any behaviour that cannot be expressed as a
//! literal or a condition is referenced by name and supplied by the host
//! application through this registry.
//!
//! # Architecture
//!
//! The registry is a small service locator holding two kinds of strategy:
//!
//! - [`RuleFunction`]: computes a value from the answers (prices, tiers,
//!   feature lists, computed conditions)
//! - [`FieldValidator`]: checks a single answer and returns an error message
//!   when the answer is unacceptable
//!
//! # Usage
//!
//! ```rust
//! use domain_rules::FunctionRegistry;
//! use serde_json::json;
//!
//! let mut registry = FunctionRegistry::new();
//! registry.register_function("merch.unitPrice", |answers, _options| {
//!     let quantity = answers.get("quantity").and_then(|v| v.as_u64()).unwrap_or(0);
//!     Ok(json!(if quantity >= 500 { 8 } else { 12 }))
//! });
//!
//! assert!(registry.has_function("merch.unitPrice"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use core_kernel::{Answers, Options};
use serde_json::Value;

use crate::error::RuleError;

/// A named computation over the answers
pub trait RuleFunction: Send + Sync {
    /// Computes a value from the current answers and options
    fn call(&self, answers: &Answers, options: &Options) -> Result<Value, RuleError>;
}

impl<F> RuleFunction for F
where
    F: Fn(&Answers, &Options) -> Result<Value, RuleError> + Send + Sync,
{
    fn call(&self, answers: &Answers, options: &Options) -> Result<Value, RuleError> {
        self(answers, options)
    }
}

/// A named check applied to a single answer
///
/// Returns `Err(message)` when the answer fails the check.
pub trait FieldValidator: Send + Sync {
    fn validate(&self, value: Option<&Value>, answers: &Answers) -> Result<(), String>;
}

impl<F> FieldValidator for F
where
    F: Fn(Option<&Value>, &Answers) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: Option<&Value>, answers: &Answers) -> Result<(), String> {
        self(value, answers)
    }
}

/// Registry of computed functions and validators, keyed by name
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn RuleFunction>>,
    validators: HashMap<String, Arc<dyn FieldValidator>>,
}

impl FunctionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a computed function, replacing any function of the same name
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&Answers, &Options) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Registers an already shared function implementation
    pub fn register_function_arc(
        &mut self,
        name: impl Into<String>,
        function: Arc<dyn RuleFunction>,
    ) -> &mut Self {
        self.functions.insert(name.into(), function);
        self
    }

    /// Registers a field validator, replacing any validator of the same name
    pub fn register_validator<F>(&mut self, name: impl Into<String>, validator: F) -> &mut Self
    where
        F: Fn(Option<&Value>, &Answers) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
        self
    }

    /// Builder-style variant of [`FunctionRegistry::register_function`]
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Answers, &Options) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        self.register_function(name, function);
        self
    }

    /// Builder-style variant of [`FunctionRegistry::register_validator`]
    pub fn with_validator<F>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(Option<&Value>, &Answers) -> Result<(), String> + Send + Sync + 'static,
    {
        self.register_validator(name, validator);
        self
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Looks up a function by name
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownFunction` if nothing is registered under `name`
    pub fn function(&self, name: &str) -> Result<&Arc<dyn RuleFunction>, RuleError> {
        self.functions
            .get(name)
            .ok_or_else(|| RuleError::UnknownFunction(name.to_string()))
    }

    /// Looks up a validator by name
    ///
    /// # Errors
    ///
    /// Returns `RuleError::UnknownValidator` if nothing is registered under `name`
    pub fn validator(&self, name: &str) -> Result<&Arc<dyn FieldValidator>, RuleError> {
        self.validators
            .get(name)
            .ok_or_else(|| RuleError::UnknownValidator(name.to_string()))
    }

    /// Calls a registered function
    ///
    /// Errors returned by the function other than `FunctionFailed` are wrapped
    /// so the failing function's name is kept in the message.
    pub fn call(&self, name: &str, answers: &Answers, options: &Options) -> Result<Value, RuleError> {
        self.function(name)?
            .call(answers, options)
            .map_err(|error| match error {
                RuleError::FunctionFailed { .. } => error,
                other => RuleError::FunctionFailed {
                    name: name.to_string(),
                    message: other.to_string(),
                },
            })
    }

    /// Returns the registered function names in sorted order
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the registered validator names in sorted order
    pub fn validator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.function_names())
            .field("validators", &self.validator_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_registered_function() {
        let registry = FunctionRegistry::new()
            .with_function("double", |answers, _| {
                let n = answers.get("n").and_then(Value::as_i64).unwrap_or(0);
                Ok(json!(n * 2))
            });

        let answers = Answers::new().with("n", 21);
        let result = registry.call("double", &answers, &Options::new()).unwrap();
        assert_eq!(result, json!(42));
    }

    #[test]
    fn test_unknown_function() {
        let registry = FunctionRegistry::new();
        let error = registry.call("missing", &Answers::new(), &Options::new()).unwrap_err();
        assert_eq!(error, RuleError::UnknownFunction("missing".to_string()));
    }

    #[test]
    fn test_function_errors_carry_name() {
        let registry = FunctionRegistry::new()
            .with_function("broken", |_, _| Err(RuleError::evaluation("boom")));

        let error = registry.call("broken", &Answers::new(), &Options::new()).unwrap_err();
        match error {
            RuleError::FunctionFailed { name, message } => {
                assert_eq!(name, "broken");
                assert!(message.contains("boom"));
            }
            other => panic!("Expected FunctionFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_validator_lookup() {
        let registry = FunctionRegistry::new().with_validator("positive", |value, _| {
            match value.and_then(Value::as_f64) {
                Some(n) if n > 0.0 => Ok(()),
                _ => Err("must be positive".to_string()),
            }
        });

        let validator = registry.validator("positive").unwrap();
        assert!(validator.validate(Some(&json!(3)), &Answers::new()).is_ok());
        assert_eq!(
            validator.validate(Some(&json!(-1)), &Answers::new()),
            Err("must be positive".to_string())
        );
        assert!(registry.validator("other").is_err());
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = FunctionRegistry::new()
            .with_function("b", |_, _| Ok(Value::Null))
            .with_function("a", |_, _| Ok(Value::Null));
        assert_eq!(registry.function_names(), vec!["a", "b"]);
    }
}
