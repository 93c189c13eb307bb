//! Recommendation Scorer
//!
//! Filters candidate templates by their conditions, fills in their
//! placeholders, then optionally orders them by priority and keeps only the
//! top entries.
//!
//! # Failure policy
//!
//! [`RecommendationEngine::generate_recommendations`] never fails. If any
//! template's conditions cannot be evaluated the whole call logs the error
//! and returns an empty list. [`RecommendationEngine::try_generate`] returns
//! the error instead.

use std::sync::Arc;

use core_kernel::{Answers, Options, RecommendationId};
use domain_rules::{ConditionEvaluator, FunctionRegistry, TemplateLookup};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecommendationError;
use crate::substitution::substitute;
use crate::template::{Recommendation, RecommendationTemplate};

/// Ordering, size limits and condition context for one generation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationOptions {
    /// Stable sort by descending priority
    pub sort_by_priority: bool,
    /// Keep only the first N after sorting; `0` means no limit
    pub max_recommendations: Option<usize>,
    /// Passed to computed template conditions
    #[serde(skip_serializing_if = "Options::is_empty")]
    pub context: Options,
}

impl RecommendationOptions {
    pub fn sorted() -> Self {
        Self {
            sort_by_priority: true,
            ..Self::default()
        }
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max_recommendations = Some(max);
        self
    }

    pub fn with_context(mut self, context: Options) -> Self {
        self.context = context;
        self
    }
}

/// Generates recommendations from templates
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    registry: Arc<FunctionRegistry>,
}

impl RecommendationEngine {
    /// Creates an engine that resolves computed conditions in `registry`
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the matching, rendered recommendations
    ///
    /// # Arguments
    ///
    /// * `answers` - The answers to evaluate conditions and placeholders against
    /// * `templates` - Candidate templates, in declaration order
    /// * `options` - Sorting, truncation and the context for computed conditions
    ///
    /// # Returns
    ///
    /// The recommendations, or an empty list if evaluation failed
    pub fn generate_recommendations(
        &self,
        answers: &Answers,
        templates: &[RecommendationTemplate],
        options: &RecommendationOptions,
    ) -> Vec<Recommendation> {
        match self.try_generate(answers, templates, options) {
            Ok(recommendations) => recommendations,
            Err(error) => {
                tracing::error!(
                    %error,
                    templates = templates.len(),
                    "Recommendation generation failed; returning no recommendations"
                );
                Vec::new()
            }
        }
    }

    /// Like [`generate_recommendations`](Self::generate_recommendations), but
    /// surfaces the first condition failure
    ///
    /// # Errors
    ///
    /// Returns an error if a computed condition of any template fails
    pub fn try_generate(
        &self,
        answers: &Answers,
        templates: &[RecommendationTemplate],
        options: &RecommendationOptions,
    ) -> Result<Vec<Recommendation>, RecommendationError> {
        let mut recommendations = Vec::new();
        for template in templates {
            if self.should_show(template, answers, &options.context)? {
                recommendations.push(self.process_template(template, answers));
            }
        }

        if options.sort_by_priority {
            recommendations.sort_by(|a, b| b.sort_priority().total_cmp(&a.sort_priority()));
        }

        if let Some(max) = options.max_recommendations.filter(|max| *max > 0) {
            recommendations.truncate(max);
        }

        tracing::debug!(
            candidates = templates.len(),
            selected = recommendations.len(),
            "Recommendations generated"
        );

        Ok(recommendations)
    }

    /// Whether a template applies to the answers
    ///
    /// Templates without conditions always apply. A list of conditions
    /// applies only when every entry holds.
    ///
    /// # Errors
    ///
    /// Returns an error if a computed condition fails
    pub fn should_show(
        &self,
        template: &RecommendationTemplate,
        answers: &Answers,
        context: &Options,
    ) -> Result<bool, RecommendationError> {
        let Some(conditions) = &template.conditions else {
            return Ok(true);
        };

        let evaluator = ConditionEvaluator::new(&self.registry);
        for condition in conditions.as_slice() {
            let holds = evaluator
                .try_evaluate(condition, answers, context)
                .map_err(|source| RecommendationError::condition(template.id.as_str(), source))?;
            if !holds {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Renders a template's placeholders against the answers
    ///
    /// Every top-level string field is substituted: `title`, `description`
    /// and any string in the template's extra fields.
    pub fn process_template(
        &self,
        template: &RecommendationTemplate,
        answers: &Answers,
    ) -> Recommendation {
        let extra: Map<String, Value> = template
            .extra
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(text) => Value::String(substitute(text, answers)),
                    other => other.clone(),
                };
                (key.clone(), value)
            })
            .collect();

        Recommendation {
            id: template.id.clone(),
            title: substitute(&template.title, answers),
            description: substitute(&template.description, answers),
            priority: template.priority,
            extra,
        }
    }

    /// Borrows `templates` as a lookup pool for `lookup` rules
    pub fn pool<'a>(&'a self, templates: &'a [RecommendationTemplate]) -> TemplatePool<'a> {
        TemplatePool {
            engine: self,
            templates,
        }
    }
}

/// Templates addressable by id, rendered through the engine on lookup
///
/// A looked-up template's own conditions are not evaluated; the rule that
/// references it supplies the condition.
pub struct TemplatePool<'a> {
    engine: &'a RecommendationEngine,
    templates: &'a [RecommendationTemplate],
}

impl TemplatePool<'_> {
    pub fn find(&self, id: &RecommendationId) -> Option<&RecommendationTemplate> {
        self.templates.iter().find(|template| &template.id == id)
    }
}

impl TemplateLookup for TemplatePool<'_> {
    fn lookup(&self, id: &RecommendationId, answers: &Answers) -> Option<Value> {
        let template = self.find(id)?;
        match serde_json::to_value(self.engine.process_template(template, answers)) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(recommendation_id = %id, %error, "Could not render recommendation");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_rules::{Condition, Operator};
    use serde_json::json;

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(FunctionRegistry::new()))
    }

    #[test]
    fn test_template_without_conditions_always_shows() {
        let template = RecommendationTemplate::new("mural", "Live mural");
        assert!(engine().should_show(&template, &Answers::new(), &Options::new()).unwrap());
    }

    #[test]
    fn test_condition_list_is_anded() {
        let template = RecommendationTemplate::new("vr", "VR Lounge").with_conditions(vec![
            Condition::compare("audience", Operator::Gte, 200),
            Condition::equals("indoor", true),
        ]);

        let both = Answers::new().with("audience", 300).with("indoor", true);
        let one = Answers::new().with("audience", 300).with("indoor", false);
        assert!(engine().should_show(&template, &both, &Options::new()).unwrap());
        assert!(!engine().should_show(&template, &one, &Options::new()).unwrap());
    }

    #[test]
    fn test_process_template_substitutes_extra_strings() {
        let template = RecommendationTemplate::new("vr", "VR for {{company}}")
            .with_extra("cta", "Book {{company}}'s demo")
            .with_extra("seats", 40);
        let answers = Answers::new().with("company", "Northwind");

        let recommendation = engine().process_template(&template, &answers);
        assert_eq!(recommendation.title, "VR for Northwind");
        assert_eq!(recommendation.extra["cta"], json!("Book Northwind's demo"));
        assert_eq!(recommendation.extra["seats"], json!(40));
    }

    #[test]
    fn test_pool_lookup_ignores_template_conditions() {
        let engine = engine();
        let templates = vec![RecommendationTemplate::new("vr", "VR")
            .with_conditions(Condition::equals("never", true))];
        let pool = engine.pool(&templates);

        let found = pool.lookup(&RecommendationId::new("vr"), &Answers::new());
        assert_eq!(found.map(|value| value["id"].clone()), Some(json!("vr")));
        assert!(pool.lookup(&RecommendationId::new("other"), &Answers::new()).is_none());
    }
}
