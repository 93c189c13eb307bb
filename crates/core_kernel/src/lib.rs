//! Core Kernel - Foundational types for the quote engine
//!
//! This crate provides the building blocks shared by every engine crate:
//! - `Answers` and `Options`, the inputs to every evaluation
//! - Dotted-path resolution over JSON values
//! - The value semantics (emptiness, truthiness, comparison) rules rely on
//! - String identifiers for schema entities

pub mod answers;
pub mod path;
pub mod value;
pub mod identifiers;
pub mod error;

pub use answers::{Answers, Options, kind_of};
pub use path::{resolve_path, resolve_in_map};
pub use identifiers::{SchemaId, SectionId, QuestionId, RecommendationId};
pub use error::CoreError;
