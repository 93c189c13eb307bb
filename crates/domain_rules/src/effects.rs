//! Effect processing
//!
//! The effect processor turns the rules of one calculation category into
//! output values. Rules run in declaration order and every contribution is
//! kept; nothing is de-duplicated.
//!
//! # Failure isolation
//!
//! A rule that fails (missing function, function error, non-numeric cost) is
//! logged, recorded as a [`Diagnostic`] and skipped. The remaining rules still
//! run. Only a failure of a delegated category function, which is not tied to
//! a single rule, is returned as an `Err` for the caller to handle.
//!
//! # Contribution semantics
//!
//! - `computed` rules: an array result contributes every element, a truthy
//!   scalar contributes itself, a falsy result contributes nothing.
//! - `literal` and `conditional` rules: an array contributes every element,
//!   `null` contributes nothing, anything else is contributed as-is.
//! - `lookup` rules contribute the resolved template when it exists and
//!   silently nothing when it does not.

use std::collections::BTreeMap;
use std::fmt;

use core_kernel::value::{as_decimal, is_truthy};
use core_kernel::{kind_of, Answers, Options, RecommendationId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::{Condition, ConditionEvaluator};
use crate::error::RuleError;
use crate::function::FunctionRegistry;
use crate::rule::{CostRule, CostRules, Rule, RuleSet, ValueSource};

/// Calculation categories a schema can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    BasePrice,
    Tier,
    Features,
    CommissionItems,
    AdditionalCosts,
    Recommendations,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BasePrice => "basePrice",
            Category::Tier => "tier",
            Category::Features => "features",
            Category::CommissionItems => "commissionItems",
            Category::AdditionalCosts => "additionalCosts",
            Category::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule failure that was absorbed during evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Category whose rule failed
    pub category: Category,
    /// Rule position (`"2"`) or cost name (`"rush"`)
    pub rule: String,
    /// Failure description
    pub message: String,
}

/// Resolves recommendation ids referenced by `lookup` rules
pub trait TemplateLookup {
    fn lookup(&self, id: &RecommendationId, answers: &Answers) -> Option<Value>;
}

impl<F> TemplateLookup for F
where
    F: Fn(&RecommendationId, &Answers) -> Option<Value>,
{
    fn lookup(&self, id: &RecommendationId, answers: &Answers) -> Option<Value> {
        self(id, answers)
    }
}

/// Evaluates rule sets for one answer set
///
/// A processor is created per evaluation and collects the diagnostics of
/// every rule it skips.
pub struct EffectProcessor<'a> {
    registry: &'a FunctionRegistry,
    answers: &'a Answers,
    options: &'a Options,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> EffectProcessor<'a> {
    pub fn new(registry: &'a FunctionRegistry, answers: &'a Answers, options: &'a Options) -> Self {
        Self {
            registry,
            answers,
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Diagnostics recorded so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the processor and returns its diagnostics
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Evaluates a condition, propagating computed-function failures
    pub fn check(&self, condition: &Condition) -> Result<bool, RuleError> {
        ConditionEvaluator::new(self.registry).try_evaluate(condition, self.answers, self.options)
    }

    /// Resolves a literal or computed value
    pub fn resolve(&self, source: &ValueSource) -> Result<Value, RuleError> {
        match source {
            ValueSource::Literal(value) => Ok(value.clone()),
            ValueSource::Computed(reference) => {
                self.registry
                    .call(&reference.function, self.answers, self.options)
            }
        }
    }

    /// Resolves a value that must be a number
    pub fn resolve_decimal(&self, source: &ValueSource, context: &str) -> Result<Decimal, RuleError> {
        let value = self.resolve(source)?;
        as_decimal(&value).ok_or_else(|| RuleError::not_numeric(context, &value))
    }

    /// Produces the output list of a category
    ///
    /// # Arguments
    ///
    /// * `category` - Category being evaluated, for diagnostics
    /// * `rules` - The category's rule set
    /// * `lookup` - Template resolver for `lookup` rules, if the category has one
    ///
    /// # Errors
    ///
    /// Returns an error only if the rule set is delegated and its function fails
    pub fn collect(
        &mut self,
        category: Category,
        rules: &RuleSet,
        lookup: Option<&dyn TemplateLookup>,
    ) -> Result<Vec<Value>, RuleError> {
        let rules = match rules {
            RuleSet::Delegated(reference) => {
                let result = self
                    .registry
                    .call(&reference.function, self.answers, self.options)?;
                return Ok(match result {
                    Value::Array(items) => items,
                    value if is_truthy(Some(&value)) => vec![value],
                    _ => Vec::new(),
                });
            }
            RuleSet::Rules(rules) => rules,
        };

        let mut output = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            if let Err(error) = self.apply_rule(rule, lookup, &mut output) {
                self.record(category, index.to_string(), &error);
            }
        }

        tracing::debug!(
            category = %category,
            rules = rules.len(),
            produced = output.len(),
            "Category evaluated"
        );

        Ok(output)
    }

    /// Produces the additional-cost map
    ///
    /// # Errors
    ///
    /// Returns an error only if the cost rules are delegated and the function
    /// fails or does not return an object
    pub fn collect_costs(&mut self, rules: &CostRules) -> Result<BTreeMap<String, Decimal>, RuleError> {
        let mut costs = BTreeMap::new();

        match rules {
            CostRules::Delegated(reference) => {
                let result = self
                    .registry
                    .call(&reference.function, self.answers, self.options)?;
                let Value::Object(entries) = result else {
                    return Err(RuleError::invalid_output(format!(
                        "cost function '{}' must return an object, got {}",
                        reference.function,
                        kind_of(&result)
                    )));
                };
                for (name, amount) in entries {
                    match as_decimal(&amount) {
                        Some(amount) => {
                            costs.insert(name, amount);
                        }
                        None => {
                            let error = RuleError::not_numeric(format!("cost '{name}'"), &amount);
                            self.record(Category::AdditionalCosts, name, &error);
                        }
                    }
                }
            }
            CostRules::Entries(entries) => {
                for (name, rule) in entries {
                    match self.apply_cost(name, rule) {
                        Ok(Some(amount)) => {
                            costs.insert(name.clone(), amount);
                        }
                        Ok(None) => {}
                        Err(error) => self.record(Category::AdditionalCosts, name.clone(), &error),
                    }
                }
            }
        }

        Ok(costs)
    }

    fn apply_rule(
        &self,
        rule: &Rule,
        lookup: Option<&dyn TemplateLookup>,
        output: &mut Vec<Value>,
    ) -> Result<(), RuleError> {
        match rule {
            Rule::Literal { value } => {
                push_value(output, value.clone());
            }
            Rule::Computed { function } => {
                match self.registry.call(function, self.answers, self.options)? {
                    Value::Array(items) => output.extend(items),
                    value if is_truthy(Some(&value)) => output.push(value),
                    _ => {}
                }
            }
            Rule::Conditional { condition, value } => {
                if self.check(condition)? {
                    push_value(output, self.resolve(value)?);
                }
            }
            Rule::Lookup {
                condition,
                recommendation_id,
            } => {
                let Some(lookup) = lookup else {
                    return Err(RuleError::invalid_output(format!(
                        "lookup of '{recommendation_id}' is only supported for recommendations"
                    )));
                };
                if self.check(condition)? {
                    if let Some(template) = lookup.lookup(recommendation_id, self.answers) {
                        output.push(template);
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_cost(&self, name: &str, rule: &CostRule) -> Result<Option<Decimal>, RuleError> {
        let source = match rule {
            CostRule::Fixed(source) => source,
            CostRule::Conditional { condition, value } => {
                if !self.check(condition)? {
                    return Ok(None);
                }
                value
            }
        };

        match self.resolve(source)? {
            Value::Null => Ok(None),
            value => as_decimal(&value)
                .map(Some)
                .ok_or_else(|| RuleError::not_numeric(format!("cost '{name}'"), &value)),
        }
    }

    /// Logs a skipped rule and adds it to the diagnostics
    fn record(&mut self, category: Category, rule: impl Into<String>, error: &RuleError) {
        let rule = rule.into();
        tracing::warn!(
            category = %category,
            rule = %rule,
            %error,
            "Rule evaluation failed; skipping its contribution"
        );
        self.diagnostics.push(Diagnostic {
            category,
            rule,
            message: error.to_string(),
        });
    }
}

fn push_value(output: &mut Vec<Value>, value: Value) {
    match value {
        Value::Array(items) => output.extend(items),
        Value::Null => {}
        other => output.push(other),
    }
}
