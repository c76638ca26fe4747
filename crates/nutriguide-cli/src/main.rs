//! NutriGuide CLI - Ingredient compatibility and condition guides from the terminal.

use clap::Parser;
use nutriguide_cli::cli::default_db_path;
use nutriguide_cli::commands;
use nutriguide_cli::{open_engine, Cli, Command, Formatter, OutputFormat};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let formatter = Formatter::new(OutputFormat::from(cli.format), !cli.no_color);

    match run(cli, &formatter).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", formatter.error(&e.to_string()));
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> nutriguide_cli::Result<String> {
    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let engine = open_engine(&db_path)?;

    match cli.command {
        Command::Compat(args) => commands::execute_compat(args, &engine, formatter).await,
        Command::Guide(args) => commands::execute_guide(args, &engine, formatter).await,
        Command::Sources(args) => commands::execute_sources(args, &engine, formatter).await,
        Command::Resolve(args) => commands::execute_resolve(args, &engine, formatter).await,
        Command::Seed(args) => commands::execute_seed(args, &engine, formatter).await,
    }
}
