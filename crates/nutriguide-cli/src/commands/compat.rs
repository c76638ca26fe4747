//! Compat command implementation.

use crate::cli::CompatArgs;
use crate::error::Result;
use crate::output::Formatter;
use nutriguide_engine::Engine;
use nutriguide_store::SqliteStore;

/// Execute the compat command.
pub async fn execute_compat(
    args: CompatArgs,
    engine: &Engine<SqliteStore>,
    formatter: &Formatter,
) -> Result<String> {
    let report = engine
        .compatibility(&args.ingredient, args.filter.into())
        .await?;
    formatter.format_compatibility(&report)
}
