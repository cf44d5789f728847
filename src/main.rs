//! Number Duel - Unified CLI
//!
//! Runs the duel server or talks to one.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use number_duel::{DuelClient, GuessRecord, PlayerView, ServerConfig, StoreBackend};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,number_duel=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            store,
            db_path,
        } => run_server(config, host, port, store, db_path).await,
        Command::State { player, server_url } => show_state(server_url, player).await,
        Command::Guess {
            player,
            value,
            server_url,
        } => submit_guess(server_url, player, value).await,
        Command::NewRound { server_url } => {
            DuelClient::new(server_url).new_round().await?;
            println!("New round started.");
            Ok(())
        }
    }
}

/// Run the HTTP game server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_server(
    config_path: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    store: Option<StoreBackend>,
    db_path: Option<String>,
) -> Result<()> {
    let mut config = ServerConfig::load(Some(&config_path))?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(store) = store {
        config = config.with_store(store);
    }
    if let Some(db_path) = db_path {
        config = config.with_db_path(db_path);
    }

    info!(store = %config.store(), "Starting Number Duel server");
    let service = config.build_service()?;
    let app = number_duel::router(service);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!(
        "Server ready at http://{}:{}/",
        config.host(),
        config.port()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down server");
        })
        .await?;

    Ok(())
}

fn format_guesses(guesses: &[GuessRecord]) -> String {
    guesses
        .iter()
        .map(|g| format!("  {}  {}", g.value(), g.feedback()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_view(view: &PlayerView) {
    println!("Player {}", view.player);
    println!(
        "Your guesses ({}/{}):",
        view.my_guess_count, view.max_guesses
    );
    if !view.my_guesses.is_empty() {
        println!("{}", format_guesses(&view.my_guesses));
    }
    println!("Opponent guesses: {}", view.other_guess_count);
    if view.game_over {
        println!("{}", format_guesses(&view.other_guesses));
        match view.winner {
            Some(winner) => println!("Round over: player {} wins.", winner),
            None => println!("Round over: both players are out of guesses."),
        }
        if let Some(secret) = view.target_revealed {
            println!("The secret was {}.", secret);
        }
    }
}

/// Print a player's view
async fn show_state(server_url: String, player: i64) -> Result<()> {
    let view = DuelClient::new(server_url).state(player).await?;
    print_view(&view);
    Ok(())
}

/// Submit a guess and print the feedback
async fn submit_guess(server_url: String, player: i64, value: String) -> Result<()> {
    let reply = DuelClient::new(server_url).guess(player, &value).await?;
    println!("{}  {}", reply.guess.value(), reply.guess.feedback());
    if reply.game_over {
        match reply.winner {
            Some(winner) => println!("Round over: player {} wins.", winner),
            None => println!("Round over: both players are out of guesses."),
        }
    }
    Ok(())
}
