//! The active-round handle and round-bets bookkeeping.
//!
//! Round lifecycle (opening, locking, resolution) is driven from outside;
//! bet processing only reads the current round and appends accepted bets.

use std::sync::{Mutex, PoisonError};
use tracing::info;

use crate::types::{Bet, Round, RoundStatus};

#[derive(Default)]
pub struct RoundTracker {
    round: Mutex<Option<Round>>,
    bets: Mutex<Vec<Bet>>,
}

impl RoundTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active round, if any.
    pub fn current(&self) -> Option<Round> {
        self.round
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Open a fresh round, replacing any previous one and dropping its bets.
    pub fn open_round(&self) -> Round {
        let round = Round::open();
        *self
            .round
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(round.clone());
        self.bets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        info!(round_id = %round.id, "Round opened");
        round
    }

    /// Move the active round to a new status. Returns false when no round
    /// is active.
    pub fn set_status(&self, status: RoundStatus) -> bool {
        let mut round = self.round.lock().unwrap_or_else(PoisonError::into_inner);
        match round.as_mut() {
            Some(r) => {
                r.status = status;
                info!(round_id = %r.id, status = %status, "Round status changed");
                true
            }
            None => false,
        }
    }

    /// Drop the active round handle. Recorded bets stay until the next
    /// `open_round` or `take_bets`.
    pub fn clear(&self) {
        *self
            .round
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Append an accepted bet to the round's list.
    pub fn record_bet(&self, bet: Bet) {
        self.bets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(bet);
    }

    /// Snapshot of the bets recorded against the current round.
    pub fn bets(&self) -> Vec<Bet> {
        self.bets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded bets, handing them to the round resolver.
    pub fn take_bets(&self) -> Vec<Bet> {
        std::mem::take(
            &mut *self
                .bets
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
