//! Player and bet persistence.
//!
//! Defines the `PlayerStore` trait and provides implementations for:
//! - SQLite (sqlx) as the durable store
//! - an in-process memory store for tests and offline runs
//!
//! The store is the source of truth for player identity and for bet
//! records. Cached balances and risk counters live in the roster; the
//! store is not consulted again for them during a round.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Bet, Player};

/// Abstraction over the persistence engine.
///
/// All monetary values cross this boundary in minor units. Lookups return
/// players carrying only the spendings-type balance record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Find a player by chat-platform identifier, or None if unregistered.
    async fn find_player_by_external_id(&self, external_id: &str) -> Result<Option<Player>>;

    /// Register a new player, seeding the spendings account with the
    /// store's configured starting balance.
    async fn register_player(&self, external_id: &str, display_name: &str) -> Result<Player>;

    /// Persist a pending bet linked to a player and a round.
    async fn create_bet(
        &self,
        selector: &str,
        amount_minor: i64,
        player_id: &str,
        round_id: &str,
    ) -> Result<Bet>;
}
