//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! quote engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Bundled schemas, answer sets and registries
//! - `builders`: Builder patterns for schemas and questions
//! - `assertions`: Custom assertion helpers for results and validation
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
