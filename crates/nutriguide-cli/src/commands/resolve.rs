//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nutriguide_engine::{Engine, EntityView};
use nutriguide_store::SqliteStore;

/// Execute the resolve command.
pub async fn execute_resolve(
    args: ResolveArgs,
    engine: &Engine<SqliteStore>,
    formatter: &Formatter,
) -> Result<String> {
    if args.text.trim().is_empty() {
        return Err(CliError::InvalidInput("Nothing to resolve".to_string()));
    }

    let entity = engine.resolve(&args.text).await?;
    formatter.format_entity(&EntityView::from(entity))
}
