//! Answer Validator
//!
//! Checks answers against the questions that ask for them. Every question is
//! checked and every failure is reported; validation never stops at the
//! first error.
//!
//! For each question, in order:
//!
//! 1. Questions must have a non-empty answer unless marked `required: false`
//! 2. `conditionalRequired` questions must have a non-blank answer when
//!    their condition holds
//! 3. `email` questions with a non-empty answer must hold a valid address
//! 4. Declared validators run in order; each may add one message

use std::sync::Arc;

use core_kernel::value::{is_blank, is_empty};
use core_kernel::{Answers, Options, QuestionId};
use domain_rules::{ConditionEvaluator, FunctionRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidateEmail;

use crate::schema::{Question, QuestionType, Schema, Section, ValidatorRule};

/// A single failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub question_id: QuestionId,
    pub message: String,
}

/// Outcome of validating a set of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Messages reported for one question
    pub fn messages_for<'a>(&'a self, question_id: &'a str) -> impl Iterator<Item = &'a str> {
        self.errors
            .iter()
            .filter(move |error| error.question_id == question_id)
            .map(|error| error.message.as_str())
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::from_errors(Vec::new())
    }
}

/// Validates answers, resolving named validators in a registry
#[derive(Debug, Clone, Default)]
pub struct AnswerValidator {
    registry: Arc<FunctionRegistry>,
}

impl AnswerValidator {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    /// Validates a schema's flat question list
    ///
    /// Schemas without a flat list are valid here; validate their sections
    /// with [`validate_section`](Self::validate_section).
    pub fn validate_answers(&self, schema: &Schema, answers: &Answers) -> ValidationResult {
        match &schema.questions {
            Some(questions) => self.validate_questions(questions, answers),
            None => ValidationResult::default(),
        }
    }

    /// Validates the questions of one section
    pub fn validate_section(&self, section: &Section, answers: &Answers) -> ValidationResult {
        self.validate_questions(&section.questions, answers)
    }

    /// Validates an arbitrary list of questions
    pub fn validate_questions(&self, questions: &[Question], answers: &Answers) -> ValidationResult {
        let mut errors = Vec::new();
        for question in questions {
            self.validate_question(question, answers, &mut errors);
        }

        tracing::debug!(
            questions = questions.len(),
            errors = errors.len(),
            "Answers validated"
        );

        ValidationResult::from_errors(errors)
    }

    fn validate_question(&self, question: &Question, answers: &Answers, errors: &mut Vec<ValidationError>) {
        let value = answers.get(question.id.as_str());
        let evaluator = ConditionEvaluator::new(&self.registry);
        let options = Options::new();
        let mut fail = |message: String| {
            errors.push(ValidationError {
                question_id: question.id.clone(),
                message,
            })
        };

        if question.is_required() && is_empty(value) {
            fail(format!("{} is required", question.display_name()));
        }

        if let Some(condition) = &question.conditional_required {
            if is_blank(value) && evaluator.evaluate(condition, answers, &options) {
                fail(format!(
                    "{} is required based on your other answers",
                    question.display_name()
                ));
            }
        }

        if question.question_type == QuestionType::Email {
            if let Some(Value::String(address)) = value {
                if !address.is_empty() && !address.validate_email() {
                    fail(format!("{} must be a valid email address", question.display_name()));
                }
            }
        }

        for rule in &question.validators {
            match rule {
                ValidatorRule::Computed(reference) => {
                    match self.registry.validator(&reference.function) {
                        Ok(validator) => {
                            if let Err(message) = validator.validate(value, answers) {
                                fail(message);
                            }
                        }
                        Err(error) => {
                            tracing::warn!(
                                question_id = %question.id,
                                %error,
                                "Skipping validator that is not registered"
                            );
                        }
                    }
                }
                ValidatorRule::Conditional { condition, message } => {
                    if evaluator.evaluate(condition, answers, &options) {
                        fail(message.clone());
                    }
                }
            }
        }
    }
}

/// Validates a schema's flat question list without named validators
pub fn validate_answers(schema: &Schema, answers: &Answers) -> ValidationResult {
    AnswerValidator::default().validate_answers(schema, answers)
}

/// Validates one section without named validators
pub fn validate_section(section: &Section, answers: &Answers) -> ValidationResult {
    AnswerValidator::default().validate_section(section, answers)
}
