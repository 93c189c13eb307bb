//! Recommendation templates and rendered recommendations
//!
//! A template is a candidate product or service description. Its
//! `conditions` decide whether it applies to an answer set; its string
//! fields may carry `{{path}}` placeholders filled in from the answers.
//!
//! ```json
//! {
//!   "id": "vr-lounge",
//!   "title": "VR Lounge for {{company}}",
//!   "description": "A headset lounge sized for {{audience}} guests",
//!   "conditions": [
//!     { "path": "audience", "operator": ">=", "value": 200 },
//!     { "path": "elements", "operator": "includes", "value": "vr" }
//!   ],
//!   "priority": 5,
//!   "category": "experiential"
//! }
//! ```

use core_kernel::RecommendationId;
use domain_rules::Condition;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// When a template applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateConditions {
    /// Every condition must hold
    All(Vec<Condition>),
    /// A single condition, including `{ "function": "name" }`
    Single(Condition),
}

impl TemplateConditions {
    /// The conditions as a slice, in declaration order
    pub fn as_slice(&self) -> &[Condition] {
        match self {
            TemplateConditions::All(conditions) => conditions,
            TemplateConditions::Single(condition) => std::slice::from_ref(condition),
        }
    }
}

impl From<Condition> for TemplateConditions {
    fn from(condition: Condition) -> Self {
        TemplateConditions::Single(condition)
    }
}

impl From<Vec<Condition>> for TemplateConditions {
    fn from(conditions: Vec<Condition>) -> Self {
        TemplateConditions::All(conditions)
    }
}

/// A candidate recommendation as authored in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationTemplate {
    pub id: RecommendationId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Absent conditions mean the template always applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<TemplateConditions>,
    /// Sort key; a missing priority sorts as 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    /// Any further authored fields, carried through to the output
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecommendationTemplate {
    pub fn new(id: impl Into<RecommendationId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            conditions: None,
            priority: None,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_conditions(mut self, conditions: impl Into<TemplateConditions>) -> Self {
        self.conditions = Some(conditions.into());
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A template that applied, with its placeholders filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: RecommendationId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recommendation {
    /// Priority used for ordering
    pub fn sort_priority(&self) -> f64 {
        self.priority.unwrap_or(0.0)
    }
}
