//! Recommendation Domain
//!
//! Turns authored recommendation templates into recommendations for a
//! particular answer set. Templates are matched by their conditions,
//! rendered by `{{path}}` substitution, and optionally ordered by priority.
//!
//! The calculator's `lookup` rules resolve through the same engine via
//! [`TemplatePool`], so both recommendation paths render identically.

pub mod template;
pub mod substitution;
pub mod engine;
pub mod error;

pub use template::{Recommendation, RecommendationTemplate, TemplateConditions};
pub use substitution::{has_placeholders, substitute};
pub use engine::{RecommendationEngine, RecommendationOptions, TemplatePool};
pub use error::RecommendationError;
