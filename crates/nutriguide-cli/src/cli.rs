//! CLI command definitions and argument parsing.

use crate::error::{CliError, Result};
use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use nutriguide_domain::Filter;
use std::path::PathBuf;

/// NutriGuide CLI - Look up ingredient compatibility and condition guides.
#[derive(Debug, Parser)]
#[command(name = "nutriguide")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "NUTRIGUIDE_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what pairs well or badly with an ingredient
    Compat(CompatArgs),

    /// Build a favor/avoid guide for one or more conditions
    Guide(GuideArgs),

    /// List every source behind an interaction
    Sources(SourcesArgs),

    /// Resolve a name or alias to an ingredient or condition
    Resolve(ResolveArgs),

    /// Import a JSON seed document into the database
    Seed(SeedArgs),
}

/// Arguments for the compat command.
#[derive(Debug, Parser)]
pub struct CompatArgs {
    /// Ingredient name or alias
    pub ingredient: String,

    /// Which bucket(s) to show
    #[arg(long, value_enum, default_value = "all")]
    pub filter: FilterArg,
}

/// Arguments for the guide command.
#[derive(Debug, Parser)]
pub struct GuideArgs {
    /// Condition names; each may hold comma-separated terms
    #[arg(required = true)]
    pub conditions: Vec<String>,

    /// Which bucket(s) to show
    #[arg(long, value_enum, default_value = "all")]
    pub filter: FilterArg,
}

/// Arguments for the sources command.
#[derive(Debug, Parser)]
pub struct SourcesArgs {
    /// Interaction ID
    pub interaction_id: i64,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Free text to resolve
    pub text: String,
}

/// Arguments for the seed command.
#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// JSON seed document
    pub file: PathBuf,
}

/// Filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterArg {
    /// Both buckets
    All,
    /// Only pairings to avoid
    Avoid,
    /// Only favorable pairings
    Beneficial,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

impl From<FilterArg> for Filter {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::All => Filter::All,
            FilterArg::Avoid => Filter::Avoid,
            FilterArg::Beneficial => Filter::Beneficial,
        }
    }
}

/// Database path used when `--db` and `NUTRIGUIDE_DB` are both absent
///
/// Creates the parent directory if needed.
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| CliError::Config("Could not find data directory".into()))?;
    let dir = data_dir.join("nutriguide");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("nutriguide.db"))
}
