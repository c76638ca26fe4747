//! Sources command implementation.

use crate::cli::SourcesArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nutriguide_engine::Engine;
use nutriguide_store::SqliteStore;

/// Execute the sources command.
pub async fn execute_sources(
    args: SourcesArgs,
    engine: &Engine<SqliteStore>,
    formatter: &Formatter,
) -> Result<String> {
    if args.interaction_id <= 0 {
        return Err(CliError::InvalidInput(
            "Interaction ID must be a positive integer".to_string(),
        ));
    }

    let audit = engine.sources(args.interaction_id).await?;
    formatter.format_sources(&audit)
}
