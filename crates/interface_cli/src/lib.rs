//! Quote CLI
//!
//! Command line access to the calculator engine:
//! - `calculate` prices a set of answers
//! - `validate` checks answers against a schema or one section
//! - `init` prints the default answers of a schema
//! - `recommend` runs the recommendation scorer
//! - `schemas` lists the bundled and configured schemas
//!
//! Configuration comes from `QUOTE_*` environment variables (a `.env` file
//! is honored) with command line flags taking precedence.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod telemetry;

pub use cli::{Cli, Command};
pub use commands::{App, Outcome};
pub use config::{CliConfig, LogFormat};
pub use error::CliError;
pub use telemetry::init_tracing;
