//! Rule definitions
//!
//! Rules are the producers of calculator output. Each rule is an explicit
//! variant tagged by `kind` in schema files:
//!
//! | kind          | JSON shape                                                   |
//! |---------------|--------------------------------------------------------------|
//! | `literal`     | `{ "kind": "literal", "value": ... }`                        |
//! | `computed`    | `{ "kind": "computed", "function": "name" }`                 |
//! | `conditional` | `{ "kind": "conditional", "condition": ..., "value": ... }`  |
//! | `lookup`      | `{ "kind": "lookup", "condition": ..., "recommendationId": "id" }` |
//!
//! A `value` is either a JSON literal or exactly `{ "function": "name" }`,
//! which defers to a registered function.

use std::collections::BTreeMap;

use core_kernel::RecommendationId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::Condition;

/// Reference to a registered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionRef {
    pub function: String,
}

impl FunctionRef {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
        }
    }
}

/// Where a rule's value comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    /// `{ "function": "name" }`
    Computed(FunctionRef),
    /// Any other JSON value, used as-is
    Literal(Value),
}

impl ValueSource {
    pub fn literal(value: impl Into<Value>) -> Self {
        ValueSource::Literal(value.into())
    }

    pub fn computed(function: impl Into<String>) -> Self {
        ValueSource::Computed(FunctionRef::new(function))
    }
}

/// A single producer of output values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rule {
    /// Always contributes `value`
    Literal { value: Value },
    /// Always runs `function` and contributes its result
    Computed { function: String },
    /// Contributes `value` when `condition` holds
    Conditional {
        condition: Condition,
        value: ValueSource,
    },
    /// Contributes the named recommendation template when `condition` holds
    #[serde(rename_all = "camelCase")]
    Lookup {
        condition: Condition,
        recommendation_id: RecommendationId,
    },
}

impl Rule {
    pub fn literal(value: impl Into<Value>) -> Self {
        Rule::Literal {
            value: value.into(),
        }
    }

    pub fn computed(function: impl Into<String>) -> Self {
        Rule::Computed {
            function: function.into(),
        }
    }

    pub fn when(condition: Condition, value: impl Into<Value>) -> Self {
        Rule::Conditional {
            condition,
            value: ValueSource::Literal(value.into()),
        }
    }

    pub fn when_computed(condition: Condition, function: impl Into<String>) -> Self {
        Rule::Conditional {
            condition,
            value: ValueSource::computed(function),
        }
    }

    pub fn lookup(condition: Condition, recommendation_id: impl Into<RecommendationId>) -> Self {
        Rule::Lookup {
            condition,
            recommendation_id: recommendation_id.into(),
        }
    }

    /// Short name of the rule's kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Literal { .. } => "literal",
            Rule::Computed { .. } => "computed",
            Rule::Conditional { .. } => "conditional",
            Rule::Lookup { .. } => "lookup",
        }
    }
}

/// The rules of one list-valued calculation category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSet {
    /// The whole category is produced by one function
    Delegated(FunctionRef),
    /// Rules evaluated in declaration order
    Rules(Vec<Rule>),
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::Rules(Vec::new())
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSet::Rules(rules)
    }
}

/// One named additional cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostRule {
    /// Charged only when `condition` holds
    Conditional {
        condition: Condition,
        value: ValueSource,
    },
    /// Always charged
    Fixed(ValueSource),
}

impl CostRule {
    pub fn fixed(amount: impl Into<Value>) -> Self {
        CostRule::Fixed(ValueSource::Literal(amount.into()))
    }

    pub fn when(condition: Condition, amount: impl Into<Value>) -> Self {
        CostRule::Conditional {
            condition,
            value: ValueSource::Literal(amount.into()),
        }
    }

    pub fn when_computed(condition: Condition, function: impl Into<String>) -> Self {
        CostRule::Conditional {
            condition,
            value: ValueSource::computed(function),
        }
    }
}

/// The additional-cost rules of a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CostRules {
    /// One function returns the whole `{ name: amount }` map
    Delegated(FunctionRef),
    /// Cost rules keyed by cost name
    Entries(BTreeMap<String, CostRule>),
}

impl Default for CostRules {
    fn default() -> Self {
        CostRules::Entries(BTreeMap::new())
    }
}

impl FromIterator<(String, CostRule)> for CostRules {
    fn from_iter<I: IntoIterator<Item = (String, CostRule)>>(iter: I) -> Self {
        CostRules::Entries(iter.into_iter().collect())
    }
}
