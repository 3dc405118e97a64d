//! In-process player store.
//!
//! Deterministic `PlayerStore` implementation holding everything in
//! memory. Used by the test suites and by the demo binary when no
//! database is configured. Errors can be forced from test code, and an
//! optional artificial latency widens interleaving windows in
//! concurrency tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use super::PlayerStore;
use crate::types::{BankAccount, Bet, BetState, Player};

pub struct MemoryStore {
    starting_balance_minor: i64,
    players: Mutex<Vec<Player>>,
    bets: Mutex<Vec<Bet>>,
    /// If set, all operations will return this error.
    force_error: Mutex<Option<String>>,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new(starting_balance_minor: i64) -> Self {
        Self {
            starting_balance_minor,
            players: Mutex::new(Vec::new()),
            bets: Mutex::new(Vec::new()),
            force_error: Mutex::new(None),
            latency: None,
        }
    }

    /// Add a fixed delay before every operation.
    pub fn with_latency(starting_balance_minor: i64, latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new(starting_balance_minor)
        }
    }

    /// Force all subsequent operations to return an error.
    pub fn set_error(&self, msg: &str) {
        *self
            .force_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(msg.to_string());
    }

    /// Clear any forced error.
    pub fn clear_error(&self) {
        *self
            .force_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Seed a player directly, bypassing registration.
    pub fn insert_player(&self, player: Player) {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(player);
    }

    /// All bets persisted so far.
    pub fn bets(&self) -> Vec<Bet> {
        self.bets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn player_count(&self) -> usize {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn pre_op(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let forced = self
            .force_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match forced {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn find_player_by_external_id(&self, external_id: &str) -> Result<Option<Player>> {
        self.pre_op().await?;
        Ok(self
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.external_id == external_id)
            .cloned())
    }

    async fn register_player(&self, external_id: &str, display_name: &str) -> Result<Player> {
        self.pre_op().await?;
        let mut players = self
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if players.iter().any(|p| p.external_id == external_id) {
            return Err(anyhow!("Player already registered: {external_id}"));
        }

        let player = Player {
            id: Uuid::new_v4().to_string(),
            external_id: external_id.to_string(),
            display_name: display_name.to_string(),
            account: BankAccount::spendings(self.starting_balance_minor),
            funds_at_risk: 0,
            previous_position: 0,
        };
        players.push(player.clone());
        Ok(player)
    }

    async fn create_bet(
        &self,
        selector: &str,
        amount_minor: i64,
        player_id: &str,
        round_id: &str,
    ) -> Result<Bet> {
        self.pre_op().await?;
        let bet = Bet {
            id: Uuid::new_v4().to_string(),
            selector: selector.to_string(),
            amount_minor,
            state: BetState::Pending,
            player_id: player_id.to_string(),
            round_id: round_id.to_string(),
            placed_at: Utc::now(),
        };
        self.bets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(bet.clone());
        Ok(bet)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
