//! NutriGuide CLI library.
//!
//! This library provides the core functionality for the `nutriguide`
//! command-line tool: argument parsing, command execution over a local
//! SQLite database, and output formatting.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};

use nutriguide_engine::{Engine, EngineConfig};
use nutriguide_store::SqliteStore;
use std::path::Path;

/// Open the database at `path` and build an engine over it
pub fn open_engine(path: &Path) -> Result<Engine<SqliteStore>> {
    let store = SqliteStore::new(path)?;
    Ok(Engine::new(store, EngineConfig::default()))
}
