//! KeyBridge server - serves a decrypted vault over HTTP.
//!
//! Performs the initial container load, then answers `/search` and
//! `/reload` requests until terminated.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use keybridge_server::{router, AppState};

#[derive(Parser)]
#[command(name = "keybridge-server")]
#[command(about = "KeyBridge - vault search over HTTP")]
#[command(version)]
struct Cli {
    /// Path to the vault container file.
    #[arg(short = 'f', long)]
    vault_file: PathBuf,

    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Vault password; prompted for when omitted.
    #[arg(short, long)]
    password: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let password = match cli.password {
        Some(password) => password,
        None => rpassword::prompt_password("Vault password: ")
            .context("Failed to read password")?,
    };

    let state = Arc::new(AppState::new(cli.vault_file.clone()));

    // The server refuses to start without a readable vault; afterwards a
    // failed reload only ever leaves the previous data in place.
    let load_state = Arc::clone(&state);
    tokio::task::spawn_blocking(move || {
        load_state.store.load(&load_state.vault_path, &password)
    })
    .await?
    .with_context(|| format!("Failed to load vault {}", cli.vault_file.display()))?;

    let snapshot = state.store.snapshot();
    info!(
        path = %cli.vault_file.display(),
        groups = snapshot.group_count(),
        entries = snapshot.entry_count(),
        "Vault loaded"
    );

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("Failed to bind {}", cli.listen))?;
    info!(addr = %cli.listen, "Listening");

    axum::serve(listener, router(state))
        .await
        .context("Server terminated")?;

    Ok(())
}
