//! Integration Tests for the quote engine
//!
//! These tests walk a schema through the full questionnaire flow: default
//! answers, validation, calculation and recommendations, across every
//! engine crate.

use core_kernel::{Answers, Options};
use domain_calculator::{initialize_answers, AnswerValidator, CalculatorEngine};
use domain_recommendation::{Recommendation, RecommendationEngine, RecommendationOptions};
use domain_rules::{Condition, CostRule, Operator, Rule};
use proptest::prelude::*;
use rust_decimal_macros::dec;
use serde_json::json;
use test_utils::*;

// ============================================================================
// Questionnaire flow
// ============================================================================

mod questionnaire_workflow {
    use super::*;

    #[test]
    fn test_scope_builder_end_to_end() {
        let schema = SchemaFixtures::scope_builder();
        let registry = RegistryFixtures::builtins();

        let mut answers = initialize_answers(&schema);
        assert_eq!(answers.get("timeline"), Some(&json!("quarter")));

        let validator = AnswerValidator::new(registry.clone());
        let first_pass = validator.validate_answers(&schema, &answers);
        assert_invalid_for(&first_pass, "projectName");
        assert_invalid_for(&first_pass, "contactEmail");

        for (question_id, value) in AnswerFixtures::scope_launch().iter() {
            answers.insert(question_id.clone(), value.clone());
        }
        assert_valid(&validator.validate_answers(&schema, &answers));

        let results =
            CalculatorEngine::new(registry).calculate_results(&schema, &answers, &Options::new());

        assert_complete(&results);
        assert_total_price_invariant(&results);
        assert_summary_consistent(&results);
        assert_eq!(results.summary.schema_type, "scope");
        assert_eq!(results.pricing.base_price, dec!(5000));
        assert_eq!(results.pricing.additional_costs["workshop"], dec!(1200));
        assert_eq!(results.pricing.total_price, dec!(6200));
        assert_features(
            &results,
            &["Discovery workshop", "Launch moment concepting", "Accelerated delivery plan"],
        );
        let rendered: Vec<Recommendation> = results.rendered_recommendations().cloned().collect();
        assert_eq!(rendered.len(), results.recommendations.len());
        assert_recommendation_ids(&rendered, &["launch-activation", "flagship-installation"]);
        assert_eq!(rendered[0].title, "Launch activation for Aurora");
    }

    #[test]
    fn test_scorer_and_calculator_share_the_template_pool() {
        let schema = SchemaFixtures::scope_builder();
        let engine = RecommendationEngine::new(RegistryFixtures::builtins());

        let scored = engine.generate_recommendations(
            &AnswerFixtures::scope_launch(),
            &schema.recommendations,
            &RecommendationOptions::sorted(),
        );

        assert_recommendation_ids(
            &scored,
            &["flagship-installation", "launch-activation", "content-series"],
        );
        assert_eq!(scored[0].description, "A multi-room installation for Aurora.");
        assert_sorted_by_priority(&scored);
    }

    #[test]
    fn test_sectioned_schema_flow() {
        let schema = SchemaFixtures::merchandise();
        let validator = AnswerValidator::new(RegistryFixtures::builtins());
        let answers = AnswerFixtures::merchandise_bulk_apparel()
            .with("contactEmail", "ada@studio.io")
            .with("deliveryDate", "2026-11-02");

        for section in &schema.sections {
            assert_valid(&validator.validate_section(section, &answers));
        }

        let results = RegistryFixtures::calculator().calculate_results(&schema, &answers, &Options::new());
        assert_complete(&results);
        assert_eq!(results.pricing.total_price, dec!(36600));
    }

    #[test]
    fn test_productions_flow() {
        let schema = SchemaFixtures::productions();
        let results = RegistryFixtures::calculator().calculate_results(
            &schema,
            &AnswerFixtures::productions_touring(),
            &Options::new(),
        );

        assert_complete(&results);
        assert_total_price_invariant(&results);
        assert_eq!(results.pricing.total_price, dec!(55900));
        assert!(results.summary.requires_commissioned_work);
    }

    #[test]
    fn test_failed_calculation_keeps_partial_results() {
        let schema = SchemaFixtures::merchandise();
        let results = RegistryFixtures::calculator().calculate_results(
            &schema,
            &AnswerFixtures::merchandise_unknown_product(),
            &Options::new(),
        );

        assert!(!results.is_complete());
        assert_total_price_invariant(&results);
        assert_summary_consistent(&results);
    }
}

// ============================================================================
// Built schemas
// ============================================================================

mod built_schema_workflow {
    use super::*;

    #[test]
    fn test_broken_function_in_one_rule_is_isolated() {
        let schema = SchemaBuilder::new("isolation")
            .with_base_price(100)
            .with_feature(Rule::literal("Kept"))
            .with_feature(Rule::computed("test.broken"))
            .with_feature(Rule::when(Condition::computed("test.flag"), "Flagged"))
            .with_cost("setup", CostRule::fixed(20))
            .build();
        let engine = CalculatorEngine::new(RegistryFixtures::with_test_functions());

        let answers = Answers::new().with("flag", true);
        let results = engine.calculate_results(&schema, &answers, &Options::new());

        assert_complete(&results);
        assert_features(&results, &["Kept", "Flagged"]);
        assert_eq!(results.diagnostics.len(), 1);
        assert_eq!(results.pricing.total_price, dec!(120));
    }

    #[test]
    fn test_conditional_requirement_from_builder() {
        let schema = SchemaBuilder::new("contact")
            .with_question(QuestionBuilder::new("rush").optional().build())
            .with_question(
                QuestionBuilder::new("deliveryDate")
                    .with_label("Delivery date")
                    .optional()
                    .required_when(Condition::equals("rush", true))
                    .build(),
            )
            .with_question(
                QuestionBuilder::new("quantity")
                    .reject_when(
                        Condition::compare("quantity", Operator::Lt, 1),
                        "Order at least one unit",
                    )
                    .build(),
            )
            .build();
        let validator = AnswerValidator::default();

        let rushed = validator
            .validate_answers(&schema, &Answers::new().with("rush", true).with("quantity", 0));
        assert_eq!(
            rushed.messages_for("deliveryDate").collect::<Vec<_>>(),
            vec!["Delivery date is required based on your other answers"]
        );
        assert_eq!(
            rushed.messages_for("quantity").collect::<Vec<_>>(),
            vec!["Order at least one unit"]
        );

        assert_valid(&validator.validate_answers(
            &schema,
            &Answers::new().with("rush", false).with("quantity", 5),
        ));
        assert_invalid_for(&validator.validate_answers(&schema, &Answers::new()), "quantity");
    }
}

// ============================================================================
// Property-based tests
// ============================================================================

mod proptests {
    use super::*;

    proptest! {
        #[test]
        fn prop_total_price_is_base_plus_costs(
            base in amount_strategy(),
            costs in cost_rules_strategy(),
            answers in answers_strategy(),
        ) {
            let mut schema = SchemaBuilder::new("generated").with_base_price(base).build();
            schema.calculations.additional_costs = costs;

            let results = RegistryFixtures::calculator().calculate_results(&schema, &answers, &Options::new());

            prop_assert!(results.error.is_none());
            assert_total_price_invariant(&results);
        }

        #[test]
        fn prop_calculation_is_deterministic(answers in answers_strategy()) {
            let schema = SchemaFixtures::productions();
            let engine = RegistryFixtures::calculator();

            let first = engine.calculate_results(&schema, &answers, &Options::new());
            let second = engine.calculate_results(&schema, &answers, &Options::new());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_sorted_recommendations_are_bounded(
            templates in templates_strategy(),
            answers in answers_strategy(),
            max in 0usize..5,
        ) {
            let engine = RecommendationEngine::new(RegistryFixtures::builtins());
            let options = RecommendationOptions::sorted().with_max(max);

            let recommendations = engine.generate_recommendations(&answers, &templates, &options);

            assert_sorted_by_priority(&recommendations);
            prop_assert!(recommendations.len() <= templates.len());
            if max > 0 {
                prop_assert!(recommendations.len() <= max);
            }
        }
    }
}
