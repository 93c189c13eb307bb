//! Condition evaluation
//!
//! A condition is a boolean expression over the answers. Schema files write
//! conditions as JSON:
//!
//! ```json
//! { "path": "rushOrder", "operator": "==", "value": true }
//! { "AND": [ { "path": "quantity", "operator": ">=", "value": 100 }, ... ] }
//! { "OR":  [ ... ] }
//! { "function": "productions.needsRigging" }
//! ```
//!
//! Parsing never fails. Any shape that is not one of the above, including a
//! comparison with an unknown operator, becomes [`Condition::Malformed`] and
//! always evaluates to `false`, so a typo in a schema can never switch a
//! feature or a discount on.

use std::fmt;
use std::str::FromStr;

use core_kernel::value::{array_contains, compare_values, is_empty, is_truthy, values_equal};
use core_kernel::{Answers, Options};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::error::RuleError;
use crate::function::FunctionRegistry;

/// Comparison operators available to leaf conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "includes")]
    Includes,
    #[serde(rename = "notIncludes")]
    NotIncludes,
    #[serde(rename = "isEmpty")]
    IsEmpty,
    #[serde(rename = "isNotEmpty")]
    IsNotEmpty,
}

impl Operator {
    /// Every operator, in declaration order
    pub const ALL: [Operator; 10] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Includes,
        Operator::NotIncludes,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
    ];

    /// Returns the symbol used in schema files
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Includes => "includes",
            Operator::NotIncludes => "notIncludes",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
        }
    }

    /// Applies the operator to a resolved answer and the expected value
    ///
    /// `includes` / `notIncludes` only look inside arrays: a non-array answer
    /// never includes anything, so `notIncludes` is true for it. Ordering
    /// operators are false whenever the two sides are not comparable.
    pub fn apply(&self, actual: Option<&Value>, expected: Option<&Value>) -> bool {
        match self {
            Operator::Eq => values_equal(actual, expected),
            Operator::NotEq => !values_equal(actual, expected),
            Operator::Gt => compare_values(actual, expected) == Some(Ordering::Greater),
            Operator::Gte => matches!(
                compare_values(actual, expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lt => compare_values(actual, expected) == Some(Ordering::Less),
            Operator::Lte => matches!(
                compare_values(actual, expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Includes => array_contains(actual, expected),
            Operator::NotIncludes => !array_contains(actual, expected),
            Operator::IsEmpty => is_empty(actual),
            Operator::IsNotEmpty => !is_empty(actual),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| format!("unknown operator '{s}'"))
    }
}

/// A boolean expression over the answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Condition {
    /// Compares the answer at `path` with `value`
    Compare {
        path: String,
        operator: Operator,
        value: Option<Value>,
    },
    /// True iff every sub-condition is true; vacuously true when empty
    All(Vec<Condition>),
    /// True iff at least one sub-condition is true; false when empty
    Any(Vec<Condition>),
    /// Delegates to a registered function and takes its truthiness
    Computed { function: String },
    /// Any unrecognised shape, kept verbatim; always false
    Malformed(Value),
}

impl Condition {
    /// Creates a comparison condition
    pub fn compare(path: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Condition::Compare {
            path: path.into(),
            operator,
            value: Some(value.into()),
        }
    }

    /// Creates an `==` comparison
    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(path, Operator::Eq, value)
    }

    /// Creates a unary comparison (`isEmpty` / `isNotEmpty`) without a value
    pub fn unary(path: impl Into<String>, operator: Operator) -> Self {
        Condition::Compare {
            path: path.into(),
            operator,
            value: None,
        }
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::All(conditions)
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Any(conditions)
    }

    pub fn computed(function: impl Into<String>) -> Self {
        Condition::Computed {
            function: function.into(),
        }
    }

    /// Returns true if neither this condition nor any nested one is malformed
    pub fn is_well_formed(&self) -> bool {
        match self {
            Condition::Malformed(_) => false,
            Condition::All(children) | Condition::Any(children) => {
                children.iter().all(Condition::is_well_formed)
            }
            Condition::Compare { .. } | Condition::Computed { .. } => true,
        }
    }

    /// Names of the functions this condition depends on
    pub fn referenced_functions(&self) -> Vec<&str> {
        match self {
            Condition::Computed { function } => vec![function.as_str()],
            Condition::All(children) | Condition::Any(children) => children
                .iter()
                .flat_map(Condition::referenced_functions)
                .collect(),
            Condition::Compare { .. } | Condition::Malformed(_) => Vec::new(),
        }
    }
}

impl Condition {
    fn parse(value: &Value) -> Option<Condition> {
        let fields = value.as_object()?;

        if let Some(Value::String(function)) = fields.get("function") {
            return Some(Condition::Computed {
                function: function.clone(),
            });
        }

        if let (Some(Value::String(path)), Some(Value::String(operator))) =
            (fields.get("path"), fields.get("operator"))
        {
            let operator = operator.parse::<Operator>().ok()?;
            return Some(Condition::Compare {
                path: path.clone(),
                operator,
                value: fields.get("value").cloned(),
            });
        }

        if let Some(children) = fields.get("AND") {
            let items = children.as_array()?;
            return Some(Condition::All(
                items.iter().cloned().map(Condition::from).collect(),
            ));
        }

        if let Some(children) = fields.get("OR") {
            let items = children.as_array()?;
            return Some(Condition::Any(
                items.iter().cloned().map(Condition::from).collect(),
            ));
        }

        None
    }
}

impl From<Value> for Condition {
    fn from(value: Value) -> Self {
        Condition::parse(&value).unwrap_or(Condition::Malformed(value))
    }
}

impl From<Condition> for Value {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Compare {
                path,
                operator,
                value,
            } => {
                let mut fields = Map::new();
                fields.insert("path".to_string(), Value::String(path));
                fields.insert(
                    "operator".to_string(),
                    Value::String(operator.symbol().to_string()),
                );
                if let Some(value) = value {
                    fields.insert("value".to_string(), value);
                }
                Value::Object(fields)
            }
            Condition::All(children) => {
                let items = children.into_iter().map(Value::from).collect();
                Value::Object(Map::from_iter([("AND".to_string(), Value::Array(items))]))
            }
            Condition::Any(children) => {
                let items = children.into_iter().map(Value::from).collect();
                Value::Object(Map::from_iter([("OR".to_string(), Value::Array(items))]))
            }
            Condition::Computed { function } => Value::Object(Map::from_iter([(
                "function".to_string(),
                Value::String(function),
            )])),
            Condition::Malformed(raw) => raw,
        }
    }
}

/// Evaluates conditions against answers, resolving computed conditions
/// through a [`FunctionRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct ConditionEvaluator<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> ConditionEvaluator<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Evaluates a condition, treating any failure as `false`
    ///
    /// A computed condition whose function is missing or fails is logged and
    /// counts as unmet.
    pub fn evaluate(&self, condition: &Condition, answers: &Answers, options: &Options) -> bool {
        match self.try_evaluate(condition, answers, options) {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(%error, "Condition evaluation failed; treating as false");
                false
            }
        }
    }

    /// Evaluates a condition, surfacing computed-function failures
    ///
    /// # Errors
    ///
    /// Returns the error of the first computed condition that fails. Malformed
    /// conditions are not errors; they evaluate to `Ok(false)`.
    pub fn try_evaluate(
        &self,
        condition: &Condition,
        answers: &Answers,
        options: &Options,
    ) -> Result<bool, RuleError> {
        match condition {
            Condition::Compare {
                path,
                operator,
                value,
            } => Ok(operator.apply(answers.resolve(path), value.as_ref())),
            Condition::All(children) => {
                for child in children {
                    if !self.try_evaluate(child, answers, options)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Any(children) => {
                for child in children {
                    if self.try_evaluate(child, answers, options)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::Computed { function } => {
                let result = self.registry.call(function, answers, options)?;
                Ok(is_truthy(Some(&result)))
            }
            Condition::Malformed(raw) => {
                tracing::debug!(condition = %raw, "Malformed condition evaluated as false");
                Ok(false)
            }
        }
    }
}

/// Evaluates a condition that needs no registered functions
///
/// Computed conditions evaluate to `false` here since no registry is available.
pub fn evaluate_condition(condition: &Condition, answers: &Answers) -> bool {
    let registry = FunctionRegistry::new();
    ConditionEvaluator::new(&registry).evaluate(condition, answers, &Options::new())
}
