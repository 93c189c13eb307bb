//! Rule Evaluation Domain
//!
//! This crate implements the small interpreter behind every calculator
//! schema: conditions over answers, rules that produce values when their
//! conditions hold, and the effect processor that turns a category's rules
//! into output.
//!
//! # Architecture
//!
//! Everything a schema author writes is data:
//! - **Conditions**: comparisons, `AND` / `OR` combinators, computed checks
//! - **Rules**: `literal`, `computed`, `conditional` and `lookup` variants
//! - **Cost rules**: named amounts, optionally gated by a condition
//!
//! Behaviour that cannot be written as data is registered by name in a
//! [`FunctionRegistry`] and referenced from the schema.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::{Answers, Options};
//! use domain_rules::{Category, Condition, EffectProcessor, FunctionRegistry, Rule, RuleSet};
//! use serde_json::json;
//!
//! let registry = FunctionRegistry::new();
//! let answers = Answers::new().with("rush", true);
//! let options = Options::new();
//!
//! let rules = RuleSet::from(vec![
//!     Rule::literal("Design consultation"),
//!     Rule::when(Condition::equals("rush", true), "Priority scheduling"),
//! ]);
//!
//! let mut processor = EffectProcessor::new(&registry, &answers, &options);
//! let features = processor.collect(Category::Features, &rules, None).unwrap();
//! assert_eq!(features, vec![json!("Design consultation"), json!("Priority scheduling")]);
//! ```

pub mod condition;
pub mod rule;
pub mod function;
pub mod effects;
pub mod error;

pub use condition::{Condition, ConditionEvaluator, Operator, evaluate_condition};
pub use rule::{CostRule, CostRules, FunctionRef, Rule, RuleSet, ValueSource};
pub use function::{FieldValidator, FunctionRegistry, RuleFunction};
pub use effects::{Category, Diagnostic, EffectProcessor, TemplateLookup};
pub use error::RuleError;
