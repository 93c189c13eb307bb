//! Command line definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{CliConfig, LogFormat};

/// Quote engine command line
#[derive(Parser, Debug)]
#[command(
    name = "quote",
    about = "Price, validate and recommend against calculator schemas",
    version
)]
pub struct Cli {
    /// Directory of additional schema files
    #[arg(long, global = true)]
    pub schema_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price a set of answers against a schema
    Calculate(CalculateArgs),
    /// Validate answers against a schema or one of its sections
    Validate(ValidateArgs),
    /// Print the default answers of a schema
    Init(SchemaArgs),
    /// Generate recommendations from a schema's templates
    Recommend(RecommendArgs),
    /// List the available schemas
    Schemas,
}

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Schema id
    #[arg(long, short)]
    pub schema: String,
}

#[derive(Args, Debug, Clone)]
pub struct AnswersArgs {
    /// JSON file of answers, or `-` for stdin
    #[arg(long, short)]
    pub answers: Option<PathBuf>,

    /// Fill unanswered questions with their schema defaults
    #[arg(long)]
    pub with_defaults: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub answers: AnswersArgs,

    /// JSON file of calculation options
    #[arg(long)]
    pub options: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub answers: AnswersArgs,

    /// Only validate the questions of this section
    #[arg(long)]
    pub section: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub answers: AnswersArgs,

    /// Order by descending priority
    #[arg(long)]
    pub sort: bool,

    /// Keep at most this many recommendations
    #[arg(long)]
    pub max: Option<usize>,

    /// JSON file of options passed to computed template conditions
    #[arg(long)]
    pub options: Option<PathBuf>,
}

impl Cli {
    /// Applies command line overrides on top of the environment
    pub fn merge_into(&self, mut config: CliConfig) -> CliConfig {
        if let Some(dir) = &self.schema_dir {
            config.schema_dir = Some(dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}
