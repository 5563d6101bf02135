//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carta", version, about = "Keep decks of cards and draw from them at random")]
pub struct Cli {
    /// Folder holding the deck database (overrides CARTA_DATA_FOLDER and the config file)
    #[arg(long, global = true)]
    pub data_folder: Option<PathBuf>,

    /// Config file (default: platform config dir, carta/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Do not import the bundled sample decks into an empty store
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate a deck JSON file and store it ("-" reads stdin)
    Import { source: String },
    /// Check a deck JSON file without storing it ("-" reads stdin)
    Validate { source: String },
    /// List stored decks
    List,
    /// Print a stored deck as JSON
    Show { id: String },
    /// Delete a stored deck
    Delete { id: String },
    /// Delete every stored deck, keeping the database
    Clear,
    /// Delete the database file entirely
    Reset,
    /// Import the bundled sample decks if the store is empty
    Seed,
    /// Draw cards from one deck
    Draw {
        id: String,
        /// Number of cards to draw
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Draw with replacement
        #[arg(long)]
        always_shuffle: bool,
        /// Seed for a reproducible draw sequence
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Interactive session over several decks
    Play,
}

impl Command {
    /// Whether first-run seeding should happen before this command
    pub fn wants_seed(&self) -> bool {
        !matches!(self, Command::Clear | Command::Reset | Command::Seed)
    }
}
