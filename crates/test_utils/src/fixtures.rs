//! Pre-built Test Fixtures
//!
//! Provides ready-to-use schemas, answer sets and registries. Answer
//! fixtures are paired with the bundled schemas and produce known prices.

use std::sync::Arc;

use core_kernel::{Answers, Options};
use domain_calculator::{builtins, CalculatorEngine, Schema, SchemaCatalog};
use domain_recommendation::RecommendationTemplate;
use domain_rules::{FunctionRegistry, RuleError};
use serde_json::json;

/// Fixture for the bundled schemas
pub struct SchemaFixtures;

impl SchemaFixtures {
    /// The bundled catalog
    pub fn catalog() -> SchemaCatalog {
        SchemaCatalog::bundled().expect("bundled schemas parse")
    }

    /// Sectioned merchandise calculator
    pub fn merchandise() -> Arc<Schema> {
        Self::bundled("merchandise")
    }

    /// Sectioned productions calculator with delegated commissions
    pub fn productions() -> Arc<Schema> {
        Self::bundled("productions")
    }

    /// Flat scope builder
    pub fn scope_builder() -> Arc<Schema> {
        Self::bundled("scope-builder")
    }

    fn bundled(id: &str) -> Arc<Schema> {
        Self::catalog()
            .get(id)
            .unwrap_or_else(|| panic!("bundled schema '{id}' exists"))
    }
}

/// Fixture for answer sets
pub struct AnswerFixtures;

impl AnswerFixtures {
    /// Merchandise order priced at 36600 in total
    pub fn merchandise_bulk_apparel() -> Answers {
        Answers::new()
            .with("productType", "apparel")
            .with("quantity", 1200)
            .with("designComplexity", "complex")
            .with("rush", true)
    }

    /// Productions brief priced at 55900 in total
    pub fn productions_touring() -> Answers {
        Answers::new()
            .with("experienceType", "touring")
            .with("audience", 1500)
            .with("elements", json!(["vr", "interactive"]))
            .with("touring", true)
            .with("cities", 4)
            .with("venueProvided", false)
            .with("company", "Northwind")
    }

    /// Scope builder answers that pass validation
    pub fn scope_launch() -> Answers {
        Answers::new()
            .with("projectName", "Aurora")
            .with("goals", json!(["launch", "awareness"]))
            .with("timeline", "month")
            .with("budgetRange", "100k-plus")
            .with("stakeholders", 12)
            .with("contactEmail", "ada@studio.io")
    }

    /// Merchandise answers naming a product the pricing functions reject
    pub fn merchandise_unknown_product() -> Answers {
        Answers::new().with("productType", "yachts").with("quantity", 10)
    }
}

/// Fixture for function registries
pub struct RegistryFixtures;

impl RegistryFixtures {
    /// The built-in functions and validators
    pub fn builtins() -> Arc<FunctionRegistry> {
        Arc::new(builtins::builtin_registry())
    }

    /// Built-ins plus a `test.broken` function that always fails, a
    /// `test.flag` condition reading the `flag` answer and a `test.preview`
    /// condition reading the `preview` option
    pub fn with_test_functions() -> Arc<FunctionRegistry> {
        let mut registry = builtins::builtin_registry();
        registry
            .register_function("test.broken", |_: &Answers, _: &Options| {
                Err(RuleError::evaluation("broken on purpose"))
            })
            .register_function("test.flag", |answers: &Answers, _: &Options| {
                Ok(json!(answers.get("flag") == Some(&json!(true))))
            })
            .register_function("test.preview", |_: &Answers, options: &Options| {
                Ok(json!(options.get("preview") == Some(&json!(true))))
            });
        Arc::new(registry)
    }

    /// A calculator over the built-ins
    pub fn calculator() -> CalculatorEngine {
        CalculatorEngine::new(Self::builtins())
    }
}

/// Fixture for recommendation templates
pub struct TemplateFixtures;

impl TemplateFixtures {
    /// Three unconditional templates with priorities 2, 5 and none
    pub fn prioritized() -> Vec<RecommendationTemplate> {
        vec![
            RecommendationTemplate::new("a", "A").with_priority(2.0),
            RecommendationTemplate::new("b", "B").with_priority(5.0),
            RecommendationTemplate::new("c", "C"),
        ]
    }

    /// A template whose title and description reference answers
    pub fn personalized() -> RecommendationTemplate {
        RecommendationTemplate::new("welcome", "Plan for {{company}}")
            .with_description("Sized for {{audience}} guests")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_fixtures_load() {
        assert_eq!(SchemaFixtures::merchandise().id, "merchandise");
        assert_eq!(SchemaFixtures::productions().id, "productions");
        assert_eq!(SchemaFixtures::scope_builder().schema_type, "scope");
    }

    #[test]
    fn test_test_functions_registered() {
        let registry = RegistryFixtures::with_test_functions();
        assert!(registry.has_function("test.broken"));
        assert!(registry.has_function("merchandise.basePrice"));
    }
}
