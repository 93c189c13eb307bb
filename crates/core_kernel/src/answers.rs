//! Answers and evaluation options
//!
//! `Answers` is the map a calculator session fills in, keyed by question id.
//! The engine only ever reads it. `Options` carries caller-supplied context
//! (currency, client segment, feature flags) through to computed rules.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::resolve_in_map;

/// User-supplied answers keyed by question id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(Map<String, Value>);

impl Answers {
    /// Creates an empty answer set
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns the answer recorded for a question
    pub fn get(&self, question_id: &str) -> Option<&Value> {
        self.0.get(question_id)
    }

    /// Resolves a dotted path such as `venue.capacity`
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        resolve_in_map(&self.0, path)
    }

    /// Records an answer, replacing any previous value
    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(question_id.into(), value.into());
    }

    /// Builder-style variant of [`Answers::insert`]
    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(question_id, value);
        self
    }

    /// Removes an answer
    pub fn remove(&mut self, question_id: &str) -> Option<Value> {
        self.0.remove(question_id)
    }

    /// Returns true if the question has a recorded answer
    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(question id, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the underlying JSON map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts the answers into a JSON object value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Answers {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Answers {
    type Error = crate::CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(crate::CoreError::not_an_object("answers", &other)),
        }
    }
}

impl FromIterator<(String, Value)> for Answers {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Caller-supplied context passed through to computed rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolves a dotted path inside the options
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        resolve_in_map(&self.0, path)
    }

    /// Builder-style setter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Short name of a JSON value's type, for error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
