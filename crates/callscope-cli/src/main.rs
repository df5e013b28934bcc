//! Callscope CLI - Analyze sales-call transcripts from the command line.

use anyhow::Context;
use callscope_cli::commands;
use callscope_cli::{Cli, Command, Config, Formatter};
use callscope_store::SqliteStore;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?;
        }
        Command::Analyze(args) => {
            let mut store = open_store(&config)?;
            commands::execute_analyze(args, &config, &mut store, &formatter).await?;
        }
        Command::List => commands::execute_list(&open_store(&config)?, &formatter)?,
        Command::Show(args) => commands::execute_show(args, &open_store(&config)?, &formatter)?,
        Command::Delete(args) => {
            commands::execute_delete(args, &mut open_store(&config)?, &formatter)?;
        }
        Command::Aggregate => {
            commands::execute_aggregate(&config.insights, &open_store(&config)?, &formatter)?;
        }
        Command::Collateral(args) => {
            let store = open_store(&config)?;
            commands::execute_collateral(args, &config, &store, &formatter).await?;
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    SqliteStore::new(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))
}
