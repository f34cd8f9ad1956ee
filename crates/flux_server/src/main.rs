//! Flux Match - server CLI
//!
//! Runs the HTTP API, applies migrations, or prints a generated board.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use flux_board::{generate_board, possible_moves};
use flux_server::{AppState, GameRepository, ServerConfig, router};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            host,
            db_path,
            config,
        } => run_server(host, port, db_path, config).await,
        Command::Migrate { db_path } => run_migrations(db_path),
        Command::Board { seed, config } => print_board(seed, config),
    }
}

/// Run the HTTP game server
#[instrument]
async fn run_server(host: String, port: u16, db_path: String, config: PathBuf) -> Result<()> {
    let config = ServerConfig::load_or_default(Some(config.as_path()))?;
    let repository = GameRepository::new(db_path)?;
    repository.run_migrations()?;

    let app = router(AppState::new(repository, &config));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Flux server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Apply pending migrations
#[instrument]
fn run_migrations(db_path: String) -> Result<()> {
    let repository = GameRepository::new(db_path)?;
    let applied = repository.run_migrations()?;
    println!("Applied {} migration(s)", applied);
    Ok(())
}

/// Generate a board and print it with its available moves
#[instrument]
fn print_board(seed: Option<u64>, config: PathBuf) -> Result<()> {
    let config = ServerConfig::load_or_default(Some(config.as_path()))?;
    let board = match seed {
        Some(seed) => generate_board(config.rules(), &mut StdRng::seed_from_u64(seed))?,
        None => generate_board(config.rules(), &mut rand::rng())?,
    };
    println!("{}", board.display());
    println!("{} possible move(s)", possible_moves(&board).len());
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,flux_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
