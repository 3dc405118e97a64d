//! Player resolution.
//!
//! Ensures the betting player is present in the roster: a cache hit is
//! returned as-is, a miss is fetched from the store, and an unregistered
//! player is registered with the starting grant and told about it.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::notify::Notifier;
use crate::roster::Roster;
use crate::store::PlayerStore;
use crate::types::{format_usd, BetError, Player};

pub struct PlayerResolver {
    store: Arc<dyn PlayerStore>,
    notifier: Arc<dyn Notifier>,
    roster: Arc<Roster>,
    channel_key: String,
    starting_balance_minor: i64,
}

impl PlayerResolver {
    pub fn new(
        store: Arc<dyn PlayerStore>,
        notifier: Arc<dyn Notifier>,
        roster: Arc<Roster>,
        channel_key: String,
        starting_balance_minor: i64,
    ) -> Self {
        Self {
            store,
            notifier,
            roster,
            channel_key,
            starting_balance_minor,
        }
    }

    /// Resolve a player by chat-platform identifier.
    ///
    /// Roster hits return the cached value without touching the store or
    /// the notifier. Misses are loaded (or registered), snapshotted into
    /// `previous_position`, and cached before returning. Storage failures
    /// surface as `BetError::Storage`; the caller must abandon the bet.
    pub async fn resolve(
        &self,
        external_id: &str,
        display_name: &str,
        guild_id: Option<&str>,
    ) -> Result<Player, BetError> {
        if let Some(cached) = self.roster.get(external_id) {
            debug!(external_id, "player already joined this round");
            return Ok(cached);
        }

        let found = self
            .store
            .find_player_by_external_id(external_id)
            .await
            .map_err(|e| {
                warn!(external_id, error = %e, "player lookup failed");
                BetError::Storage(e.to_string())
            })?;

        let mut player = match found {
            Some(player) => player,
            None => {
                let text = format!(
                    "you have now been registered, we've gifted you {} to start playing with!",
                    format_usd(self.starting_balance_minor),
                );
                if let Err(e) = self
                    .notifier
                    .notify(&self.channel_key, external_id, guild_id, &text)
                    .await
                {
                    warn!(external_id, error = %e, "registration notice failed");
                }

                self.store
                    .register_player(external_id, display_name)
                    .await
                    .map_err(|e| {
                        warn!(external_id, error = %e, "player registration failed");
                        BetError::Storage(e.to_string())
                    })?
            }
        };

        player.previous_position = player.balance_minor();
        self.roster.upsert(player.clone());
        info!(
            external_id,
            balance_minor = player.balance_minor(),
            "player joined the round"
        );

        Ok(player)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
