//! The in-memory player roster.
//!
//! An injected service object replacing ambient global state: the roster
//! caches every player who has joined the current session, and hands out
//! per-player locks that serialize settlement.
//!
//! Atomicity: `get`, `upsert`, and `replace_all` are each atomic with
//! respect to one another. Sequences of them are not; callers needing a
//! check-then-update window must hold the player's settlement lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::Player;

#[derive(Default)]
pub struct Roster {
    players: Mutex<Vec<Player>>,
    settlement_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached player by chat-platform identifier.
    pub fn get(&self, external_id: &str) -> Option<Player> {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| p.external_id == external_id)
            .cloned()
    }

    /// Insert or replace a player entry.
    ///
    /// The roster is rebuilt as "all other players" plus the new value, so
    /// readers only ever observe whole player records.
    pub fn upsert(&self, player: Player) {
        let mut players = self
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        players.retain(|p| p.id != player.id);
        players.push(player);
    }

    /// Replace the entire roster in one step.
    pub fn replace_all(&self, players: Vec<Player>) {
        *self
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = players;
    }

    /// Snapshot of all cached players.
    pub fn players(&self) -> Vec<Player> {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The settlement lock for a player, created on first use.
    ///
    /// Holding this lock across the balance-check and roster-replace window
    /// serializes concurrent settlements for one player while leaving other
    /// players free to interleave.
    pub fn settlement_lock(&self, player_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.settlement_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(player_id.to_string())
            .or_default()
            .clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
