//! Calculator Domain
//!
//! This crate ties schemas to the rule engine. It provides:
//! - The schema model: questions, sections and calculations
//! - The results calculator, which prices a set of answers
//! - The answer validator, which gates progression through a schema
//! - A catalog of schemas, including the bundled ones, and the built-in
//!   functions those schemas reference
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use core_kernel::{Answers, Options};
//! use domain_calculator::{builtins, CalculatorEngine, SchemaCatalog};
//!
//! let catalog = SchemaCatalog::bundled().unwrap();
//! let schema = catalog.get("merchandise").unwrap();
//! let engine = CalculatorEngine::new(Arc::new(builtins::builtin_registry()));
//!
//! let answers = Answers::new()
//!     .with("productType", "prints")
//!     .with("quantity", 200)
//!     .with("rush", true);
//! let results = engine.calculate_results(&schema, &answers, &Options::new());
//!
//! assert!(results.error.is_none());
//! assert_eq!(Some(results.pricing.total_price), results.pricing.checked_total());
//! ```

pub mod schema;
pub mod results;
pub mod calculator;
pub mod validation;
pub mod catalog;
pub mod builtins;
pub mod error;

pub use schema::{Calculations, Question, QuestionOption, QuestionType, Schema, Section, ValidatorRule};
pub use results::{Pricing, RecommendationEntry, Results, Summary};
pub use calculator::{initialize_answers, CalculatorEngine};
pub use validation::{
    validate_answers, validate_section, AnswerValidator, ValidationError, ValidationResult,
};
pub use catalog::SchemaCatalog;
pub use error::{CalculatorError, CatalogError};
