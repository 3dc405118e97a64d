//! Outbound user notifications.
//!
//! The chat transport lives outside this crate; the engine only knows the
//! `Notifier` seam. Delivery is fire-and-forget from the engine's
//! perspective, so implementations should do their own retrying if they
//! need any.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Abstraction over the chat-platform message transport.
///
/// `channel_key` is a symbolic key (e.g. `"BETTING_CHANNEL_ID"`) that the
/// transport resolves to a concrete channel; `guild_id` scopes the lookup
/// when the platform requires it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        channel_key: &str,
        user_id: &str,
        guild_id: Option<&str>,
        text: &str,
    ) -> Result<()>;
}

/// Notifier that writes messages to the log. Used by the demo binary and
/// anywhere a real transport is not wired up.
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(
        &self,
        channel_key: &str,
        user_id: &str,
        guild_id: Option<&str>,
        text: &str,
    ) -> Result<()> {
        info!(channel_key, user_id, guild_id, "-> {text}");
        Ok(())
    }
}
