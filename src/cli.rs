//! Command-line interface for number_duel.

use clap::{Parser, Subcommand};
use number_duel::StoreBackend;

/// Number Duel - two players, one secret code
#[derive(Parser, Debug)]
#[command(name = "number_duel")]
#[command(about = "Two-player number-guessing duel server and client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to the server config file
        #[arg(short, long, default_value = "number_duel.toml")]
        config: std::path::PathBuf,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Round store backend (overrides config)
        #[arg(long)]
        store: Option<StoreBackend>,

        /// SQLite database path (overrides config)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Show a player's view of the current round
    State {
        /// Player id (1 or 2)
        #[arg(long)]
        player: i64,

        /// Game server URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server_url: String,
    },

    /// Submit a guess
    Guess {
        /// Player id (1 or 2)
        #[arg(long)]
        player: i64,

        /// Four-digit guess
        #[arg(long)]
        value: String,

        /// Game server URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server_url: String,
    },

    /// Discard the current round and start a new one
    NewRound {
        /// Game server URL
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server_url: String,
    },
}
