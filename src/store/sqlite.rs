//! SQLite-backed player store.
//!
//! Durable `PlayerStore` implementation over sqlx. The schema is created
//! on connect so a fresh database file (or `sqlite::memory:`) is usable
//! immediately. Registration inserts the player row and its spendings
//! account in a single transaction.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use super::PlayerStore;
use crate::types::{AccountKind, BankAccount, Bet, BetState, Player};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS players (
        id TEXT PRIMARY KEY,
        external_id TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS accounts (
        player_id TEXT NOT NULL REFERENCES players(id),
        kind TEXT NOT NULL,
        balance_minor INTEGER NOT NULL,
        PRIMARY KEY (player_id, kind)
    )",
    "CREATE TABLE IF NOT EXISTS bets (
        id TEXT PRIMARY KEY,
        selector TEXT NOT NULL,
        amount_minor INTEGER NOT NULL,
        state TEXT NOT NULL,
        player_id TEXT NOT NULL REFERENCES players(id),
        round_id TEXT NOT NULL,
        placed_at TEXT NOT NULL
    )",
];

pub struct SqliteStore {
    pool: SqlitePool,
    starting_balance_minor: i64,
}

impl SqliteStore {
    /// Connect to `url` and ensure the schema exists.
    ///
    /// A single pooled connection: SQLite has one writer anyway, and an
    /// in-memory database exists per connection.
    pub async fn connect(url: &str, starting_balance_minor: i64) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .with_context(|| format!("Failed to open database: {url}"))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .context("Failed to initialise schema")?;
        }

        debug!(url, "SQLite store ready");
        Ok(Self {
            pool,
            starting_balance_minor,
        })
    }
}

#[async_trait]
impl PlayerStore for SqliteStore {
    async fn find_player_by_external_id(&self, external_id: &str) -> Result<Option<Player>> {
        let row = sqlx::query(
            "SELECT p.id, p.external_id, p.display_name, a.kind, a.balance_minor
             FROM players p
             JOIN accounts a ON a.player_id = p.id
             WHERE p.external_id = ?1 AND a.kind = ?2",
        )
        .bind(external_id)
        .bind(AccountKind::Spendings.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Player lookup failed")?;

        match row {
            Some(row) => {
                let kind: String = row.try_get("kind")?;
                Ok(Some(Player {
                    id: row.try_get("id")?,
                    external_id: row.try_get("external_id")?,
                    display_name: row.try_get("display_name")?,
                    account: BankAccount {
                        kind: AccountKind::from_str(&kind)?,
                        balance_minor: row.try_get("balance_minor")?,
                    },
                    funds_at_risk: 0,
                    previous_position: 0,
                }))
            }
            None => Ok(None),
        }
    }

    async fn register_player(&self, external_id: &str, display_name: &str) -> Result<Player> {
        let id = Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await.context("Registration failed")?;
        sqlx::query("INSERT INTO players (id, external_id, display_name) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(external_id)
            .bind(display_name)
            .execute(&mut *tx)
            .await
            .context("Failed to insert player")?;
        sqlx::query("INSERT INTO accounts (player_id, kind, balance_minor) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(AccountKind::Spendings.as_str())
            .bind(self.starting_balance_minor)
            .execute(&mut *tx)
            .await
            .context("Failed to insert account")?;
        tx.commit().await.context("Registration failed")?;

        debug!(external_id, player_id = %id, "Player registered");
        Ok(Player {
            id,
            external_id: external_id.to_string(),
            display_name: display_name.to_string(),
            account: BankAccount::spendings(self.starting_balance_minor),
            funds_at_risk: 0,
            previous_position: 0,
        })
    }

    async fn create_bet(
        &self,
        selector: &str,
        amount_minor: i64,
        player_id: &str,
        round_id: &str,
    ) -> Result<Bet> {
        let bet = Bet {
            id: Uuid::new_v4().to_string(),
            selector: selector.to_string(),
            amount_minor,
            state: BetState::Pending,
            player_id: player_id.to_string(),
            round_id: round_id.to_string(),
            placed_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO bets (id, selector, amount_minor, state, player_id, round_id, placed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&bet.id)
        .bind(&bet.selector)
        .bind(bet.amount_minor)
        .bind(bet.state.as_str())
        .bind(&bet.player_id)
        .bind(&bet.round_id)
        .bind(bet.placed_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to insert bet")?;

        Ok(bet)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
