//! Configuration loading from TOML, plus the betting-options table.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The betting-options mapping is loaded from a JSON resource named in
//! the config, layered over a built-in standard European table.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    /// Balance granted to newly registered players, minor units.
    pub starting_balance_minor: i64,
    /// Optional JSON file overriding/extending the standard betting table.
    #[serde(default)]
    pub betting_options_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// `"memory"` for the in-process store, otherwise a sqlx SQLite URL.
    pub database_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationsConfig {
    /// Channel key the transport layer resolves to the betting channel.
    pub betting_channel_key: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve the betting-options table: the standard table, with any
    /// configured JSON resource layered on top.
    pub fn betting_options(&self) -> Result<BettingOptions> {
        let base = BettingOptions::standard();
        match self.game.betting_options_file.as_deref() {
            Some(path) => Ok(base.merged(BettingOptions::from_json_file(path)?)),
            None => Ok(base),
        }
    }
}

// ---------------------------------------------------------------------------
// Betting options
// ---------------------------------------------------------------------------

/// Mapping from bet-selector key to its payout-multiplier table.
///
/// Bet processing consults this only for key existence; the multiplier
/// values are consumed by round resolution elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BettingOptions(HashMap<String, Vec<u32>>);

impl BettingOptions {
    /// The standard European table: straight numbers 0-36, the even-money
    /// outside bets, and the three dozens.
    pub fn standard() -> Self {
        let mut table = HashMap::new();
        for n in 0u32..=36 {
            table.insert(n.to_string(), vec![36]);
        }
        for key in ["red", "black", "even", "odd", "low", "high"] {
            table.insert(key.to_string(), vec![2]);
        }
        for key in ["first12", "second12", "third12"] {
            table.insert(key.to_string(), vec![3]);
        }
        BettingOptions(table)
    }

    /// Load a selector table from a JSON mapping resource.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read betting options: {path}"))?;
        let options: BettingOptions = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse betting options: {path}"))?;
        Ok(options)
    }

    /// Overlay `other` on top of this table, keeping both key sets.
    pub fn merged(mut self, other: BettingOptions) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Whether `selector` names a known wager category. All selectors
    /// compare as strings, so numeric input must be stringified first.
    pub fn contains(&self, selector: &str) -> bool {
        self.0.contains_key(selector)
    }

    /// The payout-multiplier table for a selector, if known.
    pub fn payout_table(&self, selector: &str) -> Option<&[u32]> {
        self.0.get(selector).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
