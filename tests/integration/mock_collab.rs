//! Mock collaborators for integration testing.
//!
//! Provides a deterministic `Notifier` implementation that records every
//! delivered message, all in-memory with no external dependencies. The
//! store side is covered by `MemoryStore`, which already supports forced
//! errors and artificial latency.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use croupier::notify::Notifier;

/// A message captured by the recording notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_key: String,
    pub user_id: String,
    pub guild_id: Option<String>,
    pub text: String,
}

/// A notifier that records messages instead of delivering them.
///
/// Delivery failures are fully controllable from test code.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<SentMessage>>>,
    /// If set, all deliveries will return this error.
    force_error: Arc<Mutex<Option<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force all subsequent deliveries to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Get all messages recorded so far.
    pub fn messages(&self) -> Vec<SentMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Just the message texts, in delivery order.
    pub fn texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        channel_key: &str,
        user_id: &str,
        guild_id: Option<&str>,
        text: &str,
    ) -> Result<()> {
        if let Some(err) = self.force_error.lock().unwrap().as_ref() {
            return Err(anyhow!("{}", err));
        }
        self.messages.lock().unwrap().push(SentMessage {
            channel_key: channel_key.to_string(),
            user_id: user_id.to_string(),
            guild_id: guild_id.map(str::to_string),
            text: text.to_string(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_notifier_captures_messages() {
        let notifier = RecordingNotifier::new();
        notifier
            .notify("BETTING_CHANNEL_ID", "u1", Some("g1"), "hello")
            .await
            .unwrap();
        notifier
            .notify("BETTING_CHANNEL_ID", "u2", None, "goodbye")
            .await
            .unwrap();

        assert_eq!(notifier.count(), 2);
        let messages = notifier.messages();
        assert_eq!(messages[0].channel_key, "BETTING_CHANNEL_ID");
        assert_eq!(messages[0].user_id, "u1");
        assert_eq!(messages[0].guild_id.as_deref(), Some("g1"));
        assert_eq!(notifier.texts(), vec!["hello", "goodbye"]);
    }

    #[tokio::test]
    async fn test_recording_notifier_forced_error() {
        let notifier = RecordingNotifier::new();
        notifier.set_error("simulated transport outage");

        assert!(notifier
            .notify("BETTING_CHANNEL_ID", "u1", None, "hello")
            .await
            .is_err());
        assert_eq!(notifier.count(), 0);
    }
}
