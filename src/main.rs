//! CROUPIER: chat-driven roulette betting engine.
//!
//! Demo entry point. Loads configuration, initialises structured
//! logging, opens the player store, and runs a small interactive session
//! that feeds bet commands from stdin through the engine, with graceful
//! Ctrl+C shutdown. The real chat transport replaces this loop in
//! deployment.

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use croupier::config::AppConfig;
use croupier::engine::{BetEngine, BetOutcome, BetRequest, EngineSettings};
use croupier::notify::ConsoleNotifier;
use croupier::roster::Roster;
use croupier::rounds::RoundTracker;
use croupier::store::memory::MemoryStore;
use croupier::store::sqlite::SqliteStore;
use croupier::store::PlayerStore;

const BANNER: &str = r#"
  ____ ____   ___  _   _ ____ ___ _____ ____
 / ___|  _ \ / _ \| | | |  _ \_ _| ____|  _ \
| |   | |_) | | | | | | | |_) | ||  _| | |_) |
| |___|  _ <| |_| | |_| |  __/| || |___|  _ <
 \____|_| \_\\___/ \___/|_|  |___|_____|_| \_\

  Chat-Driven Roulette Betting Engine
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        starting_balance_minor = cfg.game.starting_balance_minor,
        database_url = %cfg.storage.database_url,
        "CROUPIER starting up"
    );

    // -- Initialise components -------------------------------------------

    let options = cfg.betting_options()?;
    info!(selectors = options.len(), "Betting options loaded");

    let store: Arc<dyn PlayerStore> = if cfg.storage.database_url == "memory" {
        info!("Using in-process store");
        Arc::new(MemoryStore::new(cfg.game.starting_balance_minor))
    } else {
        Arc::new(
            SqliteStore::connect(&cfg.storage.database_url, cfg.game.starting_balance_minor)
                .await?,
        )
    };

    let roster = Arc::new(Roster::new());
    let rounds = Arc::new(RoundTracker::new());
    let engine = BetEngine::new(
        options,
        store,
        Arc::new(ConsoleNotifier),
        roster.clone(),
        rounds.clone(),
        EngineSettings {
            betting_channel_key: cfg.notifications.betting_channel_key.clone(),
            starting_balance_minor: cfg.game.starting_balance_minor,
        },
    );

    // The demo drives a single round; the round-lifecycle owner does this
    // in deployment.
    let round = rounds.open_round();
    info!(round_id = %round.id, "Accepting bets. Enter: <user> <amount> <selector>");

    // -- Main loop -------------------------------------------------------

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        let Some(request) = parse_command(&line) else {
                            warn!(input = %line, "Could not parse bet command");
                            continue;
                        };
                        match engine.process(&request).await {
                            BetOutcome::Placed(bet) => info!(%bet, "Bet placed"),
                            BetOutcome::Rejected(reason) => info!(%reason, "Bet rejected"),
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "Failed to read input");
                        break;
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    let bets = rounds.bets();
    let committed: i64 = bets.iter().map(|b| b.amount_minor).sum();
    info!(
        players = roster.len(),
        bets = bets.len(),
        committed = %croupier::types::format_usd(committed),
        "CROUPIER shut down cleanly."
    );

    Ok(())
}

/// Parse a demo command line: `<user> <amount> <selector>`.
fn parse_command(line: &str) -> Option<BetRequest> {
    let mut parts = line.split_whitespace();
    let external_id = parts.next()?;
    let amount = parts.next()?;
    let selector = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(BetRequest {
        external_id: external_id.to_string(),
        display_name: external_id.to_string(),
        guild_id: None,
        amount: amount.to_string(),
        selector: selector.to_string(),
    })
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("croupier=info"));

    let json_logging = std::env::var("CROUPIER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
