//! Top-level bet processing.
//!
//! `BetEngine` is the entry point the chat layer calls with a parsed bet
//! command. It gates on the active round, validates the raw wager,
//! resolves the player, and hands off to settlement, converting every
//! failure into at most one user notification. Nothing propagates as an
//! error past `process`.

use std::sync::Arc;
use tracing::{info, warn};

use crate::betting::{normalize, BetValidator};
use crate::config::BettingOptions;
use crate::notify::Notifier;
use crate::roster::Roster;
use crate::rounds::RoundTracker;
use crate::store::PlayerStore;
use crate::types::{Bet, BetError, RoundStatus, WagerAmount};

use super::resolver::PlayerResolver;
use super::settlement::Settlement;

// ---------------------------------------------------------------------------
// Requests & outcomes
// ---------------------------------------------------------------------------

/// A bet command as received from the chat layer, still in raw form.
#[derive(Debug, Clone)]
pub struct BetRequest {
    pub external_id: String,
    pub display_name: String,
    pub guild_id: Option<String>,
    /// Raw amount text: a number or the all-in marker.
    pub amount: String,
    /// Raw selector text, e.g. "17" or "red".
    pub selector: String,
}

/// What became of a single bet attempt.
#[derive(Debug)]
pub enum BetOutcome {
    Placed(Bet),
    Rejected(BetError),
}

impl BetOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, BetOutcome::Placed(_))
    }
}

/// Engine wiring knobs, derived from the application config.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub betting_channel_key: String,
    pub starting_balance_minor: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            betting_channel_key: "BETTING_CHANNEL_ID".to_string(),
            starting_balance_minor: 100_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct BetEngine {
    validator: BetValidator,
    resolver: PlayerResolver,
    settlement: Settlement,
    notifier: Arc<dyn Notifier>,
    rounds: Arc<RoundTracker>,
    channel_key: String,
}

impl BetEngine {
    pub fn new(
        options: BettingOptions,
        store: Arc<dyn PlayerStore>,
        notifier: Arc<dyn Notifier>,
        roster: Arc<Roster>,
        rounds: Arc<RoundTracker>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            validator: BetValidator::new(options),
            resolver: PlayerResolver::new(
                store.clone(),
                notifier.clone(),
                roster.clone(),
                settings.betting_channel_key.clone(),
                settings.starting_balance_minor,
            ),
            settlement: Settlement::new(store, roster, rounds.clone()),
            notifier,
            rounds,
            channel_key: settings.betting_channel_key,
        }
    }

    /// Process one bet command end to end.
    pub async fn process(&self, request: &BetRequest) -> BetOutcome {
        let round = match self.rounds.current() {
            Some(round) => round,
            None => {
                self.send(
                    request,
                    "there is currently no active roulette round, please try again soon.",
                )
                .await;
                return BetOutcome::Rejected(BetError::NoActiveRound);
            }
        };

        if round.status != RoundStatus::Open {
            self.send(
                request,
                "the current round is locked, you'll have to wait for the next round.",
            )
            .await;
            return BetOutcome::Rejected(BetError::RoundLocked);
        }

        info!(
            external_id = %request.external_id,
            amount = %request.amount,
            selector = %request.selector,
            "player is placing a bet"
        );

        if !self.validator.validate(&request.amount, &request.selector) {
            info!(external_id = %request.external_id, "bet rejected as invalid");
            self.send(request, "that was an invalid bet, please try again.")
                .await;
            return BetOutcome::Rejected(BetError::InvalidBet);
        }

        let player = match self
            .resolver
            .resolve(
                &request.external_id,
                &request.display_name,
                request.guild_id.as_deref(),
            )
            .await
        {
            Ok(player) => player,
            Err(e) => {
                self.send(
                    request,
                    "something went wrong while looking up your account, please try again.",
                )
                .await;
                return BetOutcome::Rejected(e);
            }
        };

        let Some(wager) = WagerAmount::parse(&request.amount) else {
            self.send(request, "that was an invalid bet, please try again.")
                .await;
            return BetOutcome::Rejected(BetError::InvalidBet);
        };
        let amount = normalize(&wager, player.balance_minor());

        match self
            .settlement
            .settle(&player, amount, &request.selector, &round.id)
            .await
        {
            Ok(bet) => {
                info!(
                    external_id = %request.external_id,
                    bet_id = %bet.id,
                    amount_minor = bet.amount_minor,
                    "bet registered against this round"
                );
                BetOutcome::Placed(bet)
            }
            Err(e @ BetError::InsufficientFunds { .. }) => {
                self.send(request, "you do not have enough funds to place this bet.")
                    .await;
                BetOutcome::Rejected(e)
            }
            Err(e) => {
                self.send(
                    request,
                    "something went wrong placing your bet, please try again.",
                )
                .await;
                BetOutcome::Rejected(e)
            }
        }
    }

    /// Process a batch of bet commands concurrently.
    ///
    /// Requests interleave at I/O suspension points; per-player
    /// serialization inside settlement keeps each balance consistent.
    pub async fn process_many(&self, requests: &[BetRequest]) -> Vec<BetOutcome> {
        futures::future::join_all(requests.iter().map(|request| self.process(request))).await
    }

    async fn send(&self, request: &BetRequest, text: &str) {
        if let Err(e) = self
            .notifier
            .notify(
                &self.channel_key,
                &request.external_id,
                request.guild_id.as_deref(),
                text,
            )
            .await
        {
            warn!(external_id = %request.external_id, error = %e, "notification failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
