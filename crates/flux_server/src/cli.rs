//! Command-line interface for flux_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flux Match - match-3 game server for Telegram mini-apps
#[derive(Parser, Debug)]
#[command(name = "flux_server")]
#[command(about = "Match-3 game server with referrals", long_about = None)]
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
        /// Port to bind to
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, env = "DATABASE_URL", default_value = "flux.db")]
        db_path: String,

        /// Path to the server config file
        #[arg(short, long, default_value = "flux.toml")]
        config: PathBuf,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the database file
        #[arg(long, env = "DATABASE_URL", default_value = "flux.db")]
        db_path: String,
    },

    /// Generate and print a board
    Board {
        /// Seed for reproducible boards
        #[arg(long)]
        seed: Option<u64>,

        /// Path to the server config file
        #[arg(short, long, default_value = "flux.toml")]
        config: PathBuf,
    },
}
