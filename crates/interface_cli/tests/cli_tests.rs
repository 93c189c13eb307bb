//! CLI Command Tests

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use domain_calculator::SchemaCatalog;
use domain_recommendation::RecommendationTemplate;
use domain_rules::Condition;
use interface_cli::{App, Cli, CliConfig, CliError};
use serde_json::{json, Value};
use test_utils::{AnswerFixtures, RegistryFixtures, SchemaBuilder, SchemaFixtures};

fn app() -> App {
    App::with_parts(SchemaFixtures::catalog(), RegistryFixtures::builtins(), CliConfig::default())
}

/// Writes `contents` to a per-test file under the system temp directory
fn write_temp(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quote-cli-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn run(app: &App, args: &[&str]) -> (Value, bool) {
    let cli = Cli::parse_from(std::iter::once("quote").chain(args.iter().copied()));
    let outcome = app.run(&cli.command).unwrap();
    (serde_json::from_str(&outcome.output).unwrap(), outcome.success)
}

mod calculate_tests {
    use super::*;

    #[test]
    fn test_calculate_prints_results() {
        let answers = write_temp(
            "merchandise.json",
            &serde_json::to_string(&AnswerFixtures::merchandise_bulk_apparel()).unwrap(),
        );

        let (output, success) = run(
            &app(),
            &["calculate", "--schema", "merchandise", "--answers", answers.to_str().unwrap()],
        );

        assert!(success);
        assert_eq!(output["pricing"]["totalPrice"], json!("36600"));
        assert_eq!(output["summary"]["tier"], json!(3));
        assert!(output.get("error").is_none());
    }

    #[test]
    fn test_failed_calculation_is_reported_but_printed() {
        let answers = write_temp(
            "yachts.json",
            &serde_json::to_string(&AnswerFixtures::merchandise_unknown_product()).unwrap(),
        );

        let (output, success) = run(
            &app(),
            &["calculate", "-s", "merchandise", "-a", answers.to_str().unwrap()],
        );

        assert!(!success);
        assert!(output["error"].as_str().unwrap().contains("basePrice"));
    }

    #[test]
    fn test_defaults_fill_unanswered_questions() {
        let answers = write_temp("prints.json", r#"{ "productType": "prints" }"#);

        let (output, _) = run(
            &app(),
            &[
                "calculate",
                "--schema",
                "merchandise",
                "--answers",
                answers.to_str().unwrap(),
                "--with-defaults",
            ],
        );

        assert!(output.get("error").is_none());
        assert_eq!(output["pricing"]["additionalCosts"]["setup"], json!("150"));
    }
}

mod validate_tests {
    use super::*;

    #[test]
    fn test_validate_section() {
        let answers = write_temp("rush.json", r#"{ "rush": true, "contactEmail": "ada@studio.io" }"#);

        let (output, success) = run(
            &app(),
            &[
                "validate",
                "--schema",
                "merchandise",
                "--section",
                "delivery",
                "--answers",
                answers.to_str().unwrap(),
            ],
        );

        assert!(!success);
        assert_eq!(output["errors"][0]["questionId"], json!("deliveryDate"));
    }

    #[test]
    fn test_validate_without_section_checks_every_question() {
        let (output, success) = run(&app(), &["validate", "--schema", "merchandise"]);

        assert!(!success);
        let ids: Vec<&str> = output["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|error| error["questionId"].as_str())
            .collect();
        assert_eq!(ids, vec!["productType", "quantity", "contactEmail"]);
    }

    #[test]
    fn test_unknown_section_is_an_error() {
        let cli = Cli::parse_from(["quote", "validate", "--schema", "merchandise", "--section", "nope"]);
        let error = app().run(&cli.command).unwrap_err();

        assert!(matches!(error, CliError::SectionNotFound { .. }));
    }
}

mod misc_tests {
    use super::*;

    #[test]
    fn test_init_prints_defaults() {
        let (output, success) = run(&app(), &["init", "--schema", "scope-builder"]);

        assert!(success);
        assert_eq!(output, json!({ "timeline": "quarter" }));
    }

    #[test]
    fn test_recommend_sorts_and_truncates() {
        let answers = write_temp(
            "scope.json",
            &serde_json::to_string(&AnswerFixtures::scope_launch()).unwrap(),
        );

        let (output, _) = run(
            &app(),
            &[
                "recommend",
                "--schema",
                "scope-builder",
                "--answers",
                answers.to_str().unwrap(),
                "--sort",
                "--max",
                "2",
            ],
        );

        let ids: Vec<&str> = output
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["flagship-installation", "launch-activation"]);
    }

    #[test]
    fn test_configured_max_applies_without_flag() {
        let config = CliConfig {
            max_recommendations: Some(1),
            ..CliConfig::default()
        };
        let app = App::with_parts(SchemaFixtures::catalog(), RegistryFixtures::builtins(), config);
        let answers = write_temp(
            "scope-max.json",
            &serde_json::to_string(&AnswerFixtures::scope_launch()).unwrap(),
        );

        let (output, _) = run(
            &app,
            &["recommend", "-s", "scope-builder", "-a", answers.to_str().unwrap(), "--sort"],
        );

        assert_eq!(output.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_recommend_passes_options_to_conditions() {
        let mut catalog = SchemaCatalog::new();
        catalog.register(
            SchemaBuilder::new("preview")
                .with_template(
                    RecommendationTemplate::new("backstage-tour", "Backstage tour")
                        .with_conditions(Condition::computed("test.preview")),
                )
                .build(),
        );
        let app = App::with_parts(catalog, RegistryFixtures::with_test_functions(), CliConfig::default());
        let options = write_temp("preview-options.json", r#"{ "preview": true }"#);

        let (without, _) = run(&app, &["recommend", "-s", "preview"]);
        let (with, _) = run(
            &app,
            &["recommend", "-s", "preview", "--options", options.to_str().unwrap()],
        );

        assert_eq!(without, json!([]));
        assert_eq!(with[0]["id"], json!("backstage-tour"));
    }

    #[test]
    fn test_schemas_lists_bundled() {
        let (output, _) = run(&app(), &["schemas"]);

        let ids: Vec<&str> = output
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|s| s["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["merchandise", "productions", "scope-builder"]);
    }

    #[test]
    fn test_unknown_schema_is_an_error() {
        let cli = Cli::parse_from(["quote", "init", "--schema", "yachts"]);
        assert!(matches!(app().run(&cli.command), Err(CliError::Catalog(_))));
    }

    #[test]
    fn test_invalid_answers_file() {
        let answers = write_temp("broken.json", "{ not json");
        let cli = Cli::parse_from([
            "quote",
            "calculate",
            "--schema",
            "merchandise",
            "--answers",
            answers.to_str().unwrap(),
        ]);

        assert!(matches!(app().run(&cli.command), Err(CliError::InvalidInput { .. })));
    }
}
