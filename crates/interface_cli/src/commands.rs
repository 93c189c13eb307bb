//! Command execution
//!
//! Every command renders its result as pretty-printed JSON. Whether the
//! process should exit successfully is reported separately so that an
//! invalid answer set or a failed calculation still prints its details.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use core_kernel::{Answers, Options};
use domain_calculator::{builtins, initialize_answers, AnswerValidator, CalculatorEngine, Schema, SchemaCatalog};
use domain_recommendation::RecommendationOptions;
use domain_rules::FunctionRegistry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::cli::{AnswersArgs, CalculateArgs, Command, RecommendArgs, ValidateArgs};
use crate::config::CliConfig;
use crate::error::CliError;

/// Rendered output of a command
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn render<T: Serialize>(value: &T, success: bool) -> Result<Self, CliError> {
        Ok(Self {
            output: serde_json::to_string_pretty(value)?,
            success,
        })
    }
}

/// Schemas and engines shared by every command
pub struct App {
    catalog: SchemaCatalog,
    calculator: CalculatorEngine,
    validator: AnswerValidator,
    config: CliConfig,
}

impl App {
    /// Builds the catalog from the bundled schemas plus `schema_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if any schema fails to load
    pub fn new(config: CliConfig) -> Result<Self, CliError> {
        let mut catalog = SchemaCatalog::bundled()?;
        if let Some(dir) = &config.schema_dir {
            catalog.load_dir(dir)?;
        }

        let registry = Arc::new(builtins::builtin_registry());
        Ok(Self::with_parts(catalog, registry, config))
    }

    /// Builds an app from an existing catalog and registry
    pub fn with_parts(catalog: SchemaCatalog, registry: Arc<FunctionRegistry>, config: CliConfig) -> Self {
        Self {
            catalog,
            calculator: CalculatorEngine::new(Arc::clone(&registry)),
            validator: AnswerValidator::new(registry),
            config,
        }
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Runs a command
    ///
    /// # Errors
    ///
    /// Returns an error if the schema or an input file cannot be loaded
    pub fn run(&self, command: &Command) -> Result<Outcome, CliError> {
        match command {
            Command::Calculate(args) => self.calculate(args),
            Command::Validate(args) => self.validate(args),
            Command::Init(args) => {
                let schema = self.catalog.require(&args.schema)?;
                Outcome::render(&initialize_answers(&schema), true)
            }
            Command::Recommend(args) => self.recommend(args),
            Command::Schemas => self.schemas(),
        }
    }

    fn calculate(&self, args: &CalculateArgs) -> Result<Outcome, CliError> {
        let schema = self.catalog.require(&args.schema.schema)?;
        let answers = load_answers(&schema, &args.answers)?;
        let options = load_options(args.options.as_deref())?;

        let results = self.calculator.calculate_results(&schema, &answers, &options);
        tracing::info!(
            schema = %schema.id,
            total_price = %results.pricing.total_price,
            complete = results.is_complete(),
            "Calculation finished"
        );

        Outcome::render(&results, results.error.is_none())
    }

    fn validate(&self, args: &ValidateArgs) -> Result<Outcome, CliError> {
        let schema = self.catalog.require(&args.schema.schema)?;
        let answers = load_answers(&schema, &args.answers)?;

        let result = match &args.section {
            Some(id) => {
                let section = schema.section(id).ok_or_else(|| CliError::SectionNotFound {
                    schema: schema.id.to_string(),
                    section: id.clone(),
                })?;
                self.validator.validate_section(section, &answers)
            }
            None => {
                let questions: Vec<_> = schema.all_questions().cloned().collect();
                self.validator.validate_questions(&questions, &answers)
            }
        };

        tracing::info!(
            schema = %schema.id,
            section = args.section.as_deref().unwrap_or("*"),
            errors = result.errors.len(),
            "Validation finished"
        );

        Outcome::render(&result, result.valid)
    }

    fn recommend(&self, args: &RecommendArgs) -> Result<Outcome, CliError> {
        let schema = self.catalog.require(&args.schema.schema)?;
        let answers = load_answers(&schema, &args.answers)?;

        let options = RecommendationOptions {
            sort_by_priority: args.sort,
            max_recommendations: args.max.or(self.config.max_recommendations),
            context: load_options(args.options.as_deref())?,
        };
        let recommendations = self.calculator.recommendation_engine().generate_recommendations(
            &answers,
            &schema.recommendations,
            &options,
        );

        Outcome::render(&recommendations, true)
    }

    fn schemas(&self) -> Result<Outcome, CliError> {
        let listing: Vec<_> = self
            .catalog
            .ids()
            .into_iter()
            .filter_map(|id| self.catalog.get(id.as_str()))
            .map(|schema| {
                json!({
                    "id": schema.id,
                    "type": schema.schema_type,
                    "title": schema.title,
                    "sections": schema.sections.len(),
                    "questions": schema.all_questions().count(),
                    "recommendations": schema.recommendations.len(),
                })
            })
            .collect();

        Outcome::render(&listing, true)
    }
}

fn load_answers(schema: &Schema, args: &AnswersArgs) -> Result<Answers, CliError> {
    let given: Answers = match &args.answers {
        Some(path) => read_json(path)?,
        None => Answers::new(),
    };

    if !args.with_defaults {
        return Ok(given);
    }

    let mut answers = initialize_answers(schema);
    for (question_id, value) in given.iter() {
        answers.insert(question_id.clone(), value.clone());
    }
    Ok(answers)
}

fn load_options(path: Option<&Path>) -> Result<Options, CliError> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Options::new()),
    }
}

/// Reads JSON from a file, or from stdin when the path is `-`
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
        text
    } else {
        fs::read_to_string(path).map_err(|source| CliError::Io { path: path.to_path_buf(), source })?
    };

    serde_json::from_str(&text).map_err(|source| CliError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}
