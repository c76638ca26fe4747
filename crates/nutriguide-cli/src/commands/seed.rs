//! Seed command implementation.

use crate::cli::SeedArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use nutriguide_engine::Engine;
use nutriguide_store::{SeedDocument, SqliteStore};

/// Execute the seed command.
///
/// The import runs in one transaction; on any conflict nothing is written.
pub async fn execute_seed(
    args: SeedArgs,
    engine: &Engine<SqliteStore>,
    formatter: &Formatter,
) -> Result<String> {
    if !args.file.is_file() {
        return Err(CliError::InvalidInput(format!(
            "Seed file not found: {}",
            args.file.display()
        )));
    }

    let doc = SeedDocument::from_file(&args.file)?;
    let store = engine.store().clone();
    let report = tokio::task::spawn_blocking(move || store.import_seed(&doc))
        .await??;

    Ok(formatter.seed_report(&report))
}
