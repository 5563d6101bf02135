//! carta - keep decks of cards and draw from them at random

use anyhow::Result;
use carta_cli::cli::{Cli, Command};
use carta_cli::{commands, BUNDLED_DECKS};
use carta_common::config::{resolve_data_folder, DataFolder, TomlConfig};
use carta_common::seed::seed_if_empty;
use carta_common::DeckStore;
use clap::Parser;
use std::io::{self, BufRead};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = TomlConfig::load_or_default(cli.config.as_deref());

    // RUST_LOG wins over the config file level; logs go to stderr
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!("carta v{}", env!("CARGO_PKG_VERSION"));

    let folder = DataFolder::new(resolve_data_folder(cli.data_folder.as_deref(), &config), &config);
    folder.ensure_directory_exists()?;
    let db_path = folder.database_path();
    info!("Database path: {}", db_path.display());

    let store = DeckStore::new(db_path);

    if !cli.no_seed && cli.command.wants_seed() {
        let report = seed_if_empty(&store, BUNDLED_DECKS).await?;
        if !report.imported.is_empty() {
            info!("Seeded {} bundled decks", report.imported.len());
        }
    }

    // Only the play loop reads commands from stdin; import/validate may read a deck from it
    let input: Box<dyn BufRead> = match cli.command {
        Command::Play => Box::new(io::stdin().lock()),
        _ => Box::new(io::empty()),
    };
    let mut stdout = io::stdout();
    let result = commands::run(cli.command, &store, input, &mut stdout).await;
    store.close().await;
    result
}
