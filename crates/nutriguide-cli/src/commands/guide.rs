//! Guide command implementation.

use crate::cli::GuideArgs;
use crate::error::Result;
use crate::output::Formatter;
use nutriguide_engine::Engine;
use nutriguide_store::SqliteStore;

/// Execute the guide command.
pub async fn execute_guide(
    args: GuideArgs,
    engine: &Engine<SqliteStore>,
    formatter: &Formatter,
) -> Result<String> {
    let report = engine.guide(&args.conditions, args.filter.into()).await?;
    formatter.format_guide(&report)
}
