//! Bet settlement.
//!
//! The money-moving half of the workflow: checks the balance, persists
//! the pending bet, and publishes the debited player back to the roster.
//! Settlements for one player are serialized through the roster's
//! per-player lock, so the balance check always runs against the state
//! the update will replace.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::betting::to_minor_units;
use crate::roster::Roster;
use crate::rounds::RoundTracker;
use crate::store::PlayerStore;
use crate::types::{Bet, BetError, Player};

pub struct Settlement {
    store: Arc<dyn PlayerStore>,
    roster: Arc<Roster>,
    rounds: Arc<RoundTracker>,
}

impl Settlement {
    pub fn new(store: Arc<dyn PlayerStore>, roster: Arc<Roster>, rounds: Arc<RoundTracker>) -> Self {
        Self {
            store,
            roster,
            rounds,
        }
    }

    /// Settle a validated wager against the active round.
    ///
    /// The round's OPEN status was checked by the caller and is not
    /// re-validated here. On any failure nothing is mutated: the bet
    /// record, the roster update, and the round-bets append happen only
    /// together.
    pub async fn settle(
        &self,
        player: &Player,
        amount: Decimal,
        selector: &str,
        round_id: &str,
    ) -> Result<Bet, BetError> {
        let Some(stake_minor) = to_minor_units(amount) else {
            return Err(BetError::InvalidBet);
        };

        let lock = self.roster.settlement_lock(&player.id);
        let _guard = lock.lock().await;

        // re-read under the lock; the resolver's copy may be stale
        let current = self
            .roster
            .get(&player.external_id)
            .unwrap_or_else(|| player.clone());

        if current.balance_minor() < stake_minor {
            debug!(
                external_id = %current.external_id,
                stake_minor,
                balance_minor = current.balance_minor(),
                "wager exceeds balance"
            );
            return Err(BetError::InsufficientFunds {
                needed_minor: stake_minor,
                available_minor: current.balance_minor(),
            });
        }

        let bet = self
            .store
            .create_bet(selector, stake_minor, &current.id, round_id)
            .await
            .map_err(|e| {
                warn!(external_id = %current.external_id, error = %e, "bet creation failed");
                BetError::Storage(e.to_string())
            })?;

        self.roster.upsert(current.with_wager_applied(stake_minor));
        self.rounds.record_bet(bet.clone());

        Ok(bet)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
