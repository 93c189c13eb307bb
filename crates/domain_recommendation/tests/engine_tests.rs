//! Recommendation Engine Tests
//!
//! Covers template selection, priority ordering, truncation, placeholder
//! rendering and the empty-list failure policy.

use std::sync::Arc;

use core_kernel::{Answers, Options};
use domain_recommendation::{
    RecommendationEngine, RecommendationError, RecommendationOptions, RecommendationTemplate,
};
use domain_rules::{Condition, FunctionRegistry, Operator, RuleError};
use serde_json::{json, Value};

fn registry() -> Arc<FunctionRegistry> {
    Arc::new(
        FunctionRegistry::new()
            .with_function("isLargeEvent", |answers, _| {
                let audience = answers.get("audience").and_then(Value::as_u64).unwrap_or(0);
                Ok(json!(audience >= 1000))
            })
            .with_function("isVipPreview", |_, options| {
                Ok(json!(options.get("channel") == Some(&json!("vip"))))
            })
            .with_function("unavailable", |_, _| {
                Err(RuleError::evaluation("availability service down"))
            }),
    )
}

fn engine() -> RecommendationEngine {
    RecommendationEngine::new(registry())
}

fn templates() -> Vec<RecommendationTemplate> {
    vec![
        RecommendationTemplate::new("photo-booth", "Photo booth").with_priority(1.0),
        RecommendationTemplate::new("vr-lounge", "VR lounge")
            .with_conditions(Condition::compare("audience", Operator::Gte, 200))
            .with_priority(5.0),
        RecommendationTemplate::new("stage", "Main stage")
            .with_conditions(Condition::computed("isLargeEvent"))
            .with_priority(8.0),
        RecommendationTemplate::new("guestbook", "Digital guestbook"),
    ]
}

fn ids(recommendations: &[domain_recommendation::Recommendation]) -> Vec<&str> {
    recommendations.iter().map(|r| r.id.as_str()).collect()
}

// ============================================================================
// SELECTION TESTS
// ============================================================================

mod selection_tests {
    use super::*;

    #[test]
    fn test_declaration_order_without_sorting() {
        let answers = Answers::new().with("audience", 300);
        let result =
            engine().generate_recommendations(&answers, &templates(), &RecommendationOptions::default());

        assert_eq!(ids(&result), vec!["photo-booth", "vr-lounge", "guestbook"]);
    }

    #[test]
    fn test_computed_condition_selects_template() {
        let answers = Answers::new().with("audience", 5000);
        let result =
            engine().generate_recommendations(&answers, &templates(), &RecommendationOptions::default());

        assert!(ids(&result).contains(&"stage"));
    }

    #[test]
    fn test_computed_condition_receives_call_context() {
        let templates = vec![
            RecommendationTemplate::new("backstage-tour", "Backstage tour")
                .with_conditions(Condition::computed("isVipPreview")),
        ];
        let vip = RecommendationOptions::default()
            .with_context(Options::new().with("channel", "vip"));

        let shown = engine().generate_recommendations(&Answers::new(), &templates, &vip);
        let hidden = engine().generate_recommendations(
            &Answers::new(),
            &templates,
            &RecommendationOptions::default(),
        );

        assert_eq!(ids(&shown), vec!["backstage-tour"]);
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_malformed_condition_hides_template() {
        let templates: Vec<RecommendationTemplate> = serde_json::from_value(json!([
            { "id": "broken", "title": "Broken", "conditions": { "audience": 10 } },
            { "id": "fine", "title": "Fine" }
        ]))
        .unwrap();

        let result = engine().generate_recommendations(
            &Answers::new().with("audience", 10),
            &templates,
            &RecommendationOptions::default(),
        );
        assert_eq!(ids(&result), vec!["fine"]);
    }
}

// ============================================================================
// ORDERING TESTS
// ============================================================================

mod ordering_tests {
    use super::*;

    #[test]
    fn test_highest_priority_wins_when_truncated() {
        let templates = vec![
            RecommendationTemplate::new("low", "Low").with_priority(1.0),
            RecommendationTemplate::new("high", "High").with_priority(5.0),
        ];
        let options = RecommendationOptions::sorted().with_max(1);

        let result = engine().generate_recommendations(&Answers::new(), &templates, &options);
        assert_eq!(ids(&result), vec!["high"]);
    }

    #[test]
    fn test_sort_is_stable_and_missing_priority_is_zero() {
        let templates = vec![
            RecommendationTemplate::new("a", "A"),
            RecommendationTemplate::new("b", "B").with_priority(0.0),
            RecommendationTemplate::new("c", "C").with_priority(-1.0),
            RecommendationTemplate::new("d", "D"),
            RecommendationTemplate::new("e", "E").with_priority(2.0),
        ];

        let result =
            engine().generate_recommendations(&Answers::new(), &templates, &RecommendationOptions::sorted());
        assert_eq!(ids(&result), vec!["e", "a", "b", "d", "c"]);
    }

    #[test]
    fn test_truncation_without_sorting_keeps_declaration_order() {
        let options = RecommendationOptions::default().with_max(2);
        let result = engine().generate_recommendations(
            &Answers::new().with("audience", 300),
            &templates(),
            &options,
        );
        assert_eq!(ids(&result), vec!["photo-booth", "vr-lounge"]);
    }

    #[test]
    fn test_zero_max_does_not_truncate() {
        let options = RecommendationOptions::sorted().with_max(0);
        let result = engine().generate_recommendations(&Answers::new(), &templates(), &options);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_options_parse_from_camel_case() {
        let options: RecommendationOptions =
            serde_json::from_value(json!({ "sortByPriority": true, "maxRecommendations": 3 }))
                .unwrap();
        assert_eq!(options, RecommendationOptions::sorted().with_max(3));

        let with_context: RecommendationOptions =
            serde_json::from_value(json!({ "context": { "channel": "vip" } })).unwrap();
        assert_eq!(with_context.context.get("channel"), Some(&json!("vip")));
    }
}

// ============================================================================
// RENDERING TESTS
// ============================================================================

mod rendering_tests {
    use super::*;

    fn greeting() -> Vec<RecommendationTemplate> {
        vec![RecommendationTemplate::new("hello", "Welcome").with_description("Hello {{user.name}}")]
    }

    #[test]
    fn test_placeholder_is_resolved() {
        let answers = Answers::new().with("user", json!({ "name": "Ada" }));
        let result =
            engine().generate_recommendations(&answers, &greeting(), &RecommendationOptions::default());

        assert_eq!(result[0].description, "Hello Ada");
    }

    #[test]
    fn test_unresolved_placeholder_is_kept() {
        let result = engine().generate_recommendations(
            &Answers::new(),
            &greeting(),
            &RecommendationOptions::default(),
        );

        assert_eq!(result[0].description, "Hello {{user.name}}");
    }
}

// ============================================================================
// FAILURE TESTS
// ============================================================================

mod failure_tests {
    use super::*;

    fn failing_templates() -> Vec<RecommendationTemplate> {
        let mut templates = templates();
        templates.push(
            RecommendationTemplate::new("flaky", "Flaky")
                .with_conditions(Condition::computed("unavailable")),
        );
        templates
    }

    #[test]
    fn test_condition_failure_returns_empty_list() {
        let result = engine().generate_recommendations(
            &Answers::new(),
            &failing_templates(),
            &RecommendationOptions::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_try_generate_reports_failing_template() {
        let error = engine()
            .try_generate(&Answers::new(), &failing_templates(), &RecommendationOptions::default())
            .unwrap_err();

        match error {
            RecommendationError::Condition { id, .. } => assert_eq!(id, "flaky"),
            other => panic!("Expected condition error, got {other:?}"),
        }
    }
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn template_strategy() -> impl Strategy<Value = Vec<RecommendationTemplate>> {
        proptest::collection::vec(proptest::option::of(-10i32..10), 0..12).prop_map(|priorities| {
            priorities
                .into_iter()
                .enumerate()
                .map(|(index, priority)| {
                    let template = RecommendationTemplate::new(format!("t{index}"), "Template");
                    match priority {
                        Some(priority) => template.with_priority(f64::from(priority)),
                        None => template,
                    }
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn sorted_output_is_descending_and_bounded(
            templates in template_strategy(),
            max in 1usize..6,
        ) {
            let options = RecommendationOptions::sorted().with_max(max);
            let result = engine().generate_recommendations(&Answers::new(), &templates, &options);

            prop_assert_eq!(result.len(), templates.len().min(max));
            for pair in result.windows(2) {
                prop_assert!(pair[0].sort_priority() >= pair[1].sort_priority());
            }
        }

        #[test]
        fn generation_is_idempotent(templates in template_strategy()) {
            let engine = engine();
            let options = RecommendationOptions::sorted();
            let first = engine.generate_recommendations(&Answers::new(), &templates, &options);
            let second = engine.generate_recommendations(&Answers::new(), &templates, &options);
            prop_assert_eq!(first, second);
        }
    }
}
