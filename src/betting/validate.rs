//! Wager validation.
//!
//! Checks the raw chat input before any player or storage work happens:
//! the amount must be the all-in marker or a strictly positive number,
//! and the selector must name a configured wager category.

use tracing::debug;

use crate::config::BettingOptions;
use crate::types::WagerAmount;

pub struct BetValidator {
    options: BettingOptions,
}

impl BetValidator {
    pub fn new(options: BettingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BettingOptions {
        &self.options
    }

    /// Validate a raw wager. Both rules are evaluated; neither mutates any
    /// state, so there is nothing to short-circuit.
    pub fn validate(&self, raw_amount: &str, raw_selector: &str) -> bool {
        let amount_ok = match WagerAmount::parse(raw_amount) {
            Some(wager) => wager.is_positive(),
            None => false,
        };

        let selector_ok = self.options.contains(raw_selector);
        if !selector_ok {
            debug!(selector = raw_selector, "unknown bet selector");
        }

        amount_ok && selector_ok
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
