//! Calculator schemas
//!
//! A schema is the static definition of one quoting flow: the questions
//! asked (flat, in sections, or both), and the calculations that turn the
//! answers into pricing, features and recommendations.
//!
//! Schemas are authored as JSON and never mutated at runtime:
//!
//! ```json
//! {
//!   "id": "merchandise",
//!   "type": "merchandise",
//!   "title": "Custom Merchandise",
//!   "sections": [
//!     { "id": "order", "title": "Your order", "questions": [
//!       { "id": "quantity", "type": "number", "label": "Quantity", "required": true }
//!     ]}
//!   ],
//!   "calculations": {
//!     "basePrice": { "function": "merchandise.basePrice" },
//!     "additionalCosts": {
//!       "rush": { "condition": { "path": "rush", "operator": "==", "value": true }, "value": 50 }
//!     }
//!   }
//! }
//! ```

use core_kernel::{QuestionId, SchemaId, SectionId};
use domain_recommendation::RecommendationTemplate;
use domain_rules::{Condition, CostRule, CostRules, FunctionRef, Rule, RuleSet, ValueSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete calculator definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub id: SchemaId,
    /// Reported as `summary.type` in results
    #[serde(rename = "type", default)]
    pub schema_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Flat question list; `None` for purely sectioned schemas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub calculations: Calculations,
    /// Pool of templates that `lookup` rules and the scorer draw from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<RecommendationTemplate>,
}

impl Schema {
    pub fn new(id: impl Into<SchemaId>, schema_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema_type: schema_type.into(),
            title: String::new(),
            description: None,
            questions: None,
            sections: Vec::new(),
            calculations: Calculations::default(),
            recommendations: Vec::new(),
        }
    }

    /// Every question, flat questions first, then each section's in order
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .flatten()
            .chain(self.sections.iter().flat_map(|section| section.questions.iter()))
    }

    /// Finds a question anywhere in the schema
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.all_questions().find(|question| question.id == id)
    }

    /// Finds a section by id
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Names of every function and validator the schema references
    pub fn referenced_functions(&self) -> Vec<&str> {
        let mut names = self.calculations.referenced_functions();
        for question in self.all_questions() {
            if let Some(condition) = &question.conditional_required {
                names.extend(condition.referenced_functions());
            }
            for validator in &question.validators {
                match validator {
                    ValidatorRule::Computed(reference) => names.push(reference.function.as_str()),
                    ValidatorRule::Conditional { condition, .. } => {
                        names.extend(condition.referenced_functions())
                    }
                }
            }
        }
        for template in &self.recommendations {
            if let Some(conditions) = &template.conditions {
                for condition in conditions.as_slice() {
                    names.extend(condition.referenced_functions());
                }
            }
        }
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// A titled group of questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Input control of a question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Phone,
    Select,
    Multiselect,
    Radio,
    Checkbox,
    Boolean,
    Date,
    Range,
    #[serde(other)]
    Other,
}

/// A single question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Questions are required unless this is `Some(false)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<ValidatorRule>,
    /// Required only when this condition holds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_required: Option<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>, question_type: QuestionType) -> Self {
        Self {
            id: id.into(),
            question_type,
            label: None,
            required: None,
            default_value: None,
            validators: Vec::new(),
            conditional_required: None,
            options: Vec::new(),
        }
    }

    /// Marks the question as optional
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required != Some(false)
    }

    /// Label if present, otherwise the id
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

/// A selectable choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionOption {
    Labeled { value: Value, label: String },
    Plain(Value),
}

impl QuestionOption {
    pub fn value(&self) -> &Value {
        match self {
            QuestionOption::Labeled { value, .. } | QuestionOption::Plain(value) => value,
        }
    }
}

/// A custom check attached to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidatorRule {
    /// `{ "function": "name" }`: a registered validator returning an error message
    Computed(FunctionRef),
    /// Fails with `message` when `condition` holds
    Conditional { condition: Condition, message: String },
}

/// What a schema computes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Calculations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<ValueSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<ValueSource>,
    pub features: RuleSet,
    pub commission_items: RuleSet,
    pub additional_costs: CostRules,
    pub recommendations: RuleSet,
}

impl Calculations {
    fn referenced_functions(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for source in [&self.base_price, &self.tier].into_iter().flatten() {
            if let ValueSource::Computed(reference) = source {
                names.push(reference.function.as_str());
            }
        }
        for rules in [
            &self.features,
            &self.commission_items,
            &self.recommendations,
        ] {
            names.extend(rule_set_functions(rules));
        }
        match &self.additional_costs {
            CostRules::Delegated(reference) => names.push(reference.function.as_str()),
            CostRules::Entries(entries) => {
                for rule in entries.values() {
                    match rule {
                        CostRule::Fixed(source) => names.extend(source_function(source)),
                        CostRule::Conditional { condition, value } => {
                            names.extend(condition.referenced_functions());
                            names.extend(source_function(value));
                        }
                    }
                }
            }
        }
        names
    }
}

fn source_function(source: &ValueSource) -> Option<&str> {
    match source {
        ValueSource::Computed(reference) => Some(reference.function.as_str()),
        ValueSource::Literal(_) => None,
    }
}

fn rule_set_functions(rules: &RuleSet) -> Vec<&str> {
    match rules {
        RuleSet::Delegated(reference) => vec![reference.function.as_str()],
        RuleSet::Rules(rules) => rules
            .iter()
            .flat_map(|rule| match rule {
                Rule::Literal { .. } => Vec::new(),
                Rule::Computed { function } => vec![function.as_str()],
                Rule::Conditional { condition, value } => {
                    let mut names = condition.referenced_functions();
                    names.extend(source_function(value));
                    names
                }
                Rule::Lookup { condition, .. } => condition.referenced_functions(),
            })
            .collect(),
    }
}
