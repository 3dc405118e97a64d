//! Shared types for the CROUPIER engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that store, betting, and engine
//! modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The literal wager marker meaning "stake my entire current balance".
pub const ALL_IN_MARKER: &str = "all";

// ---------------------------------------------------------------------------
// Wager amount
// ---------------------------------------------------------------------------

/// A raw wager amount, parsed once at the boundary.
///
/// Chat input is either the all-in marker or a decimal figure in major
/// currency units. Parsing never judges positivity; that is the
/// validator's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WagerAmount {
    AllIn,
    Fixed(Decimal),
}

impl WagerAmount {
    /// Parse a raw chat amount. Returns None for non-numeric input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw == ALL_IN_MARKER {
            return Some(WagerAmount::AllIn);
        }
        Decimal::from_str(raw).ok().map(WagerAmount::Fixed)
    }

    /// Whether this wager can ever be staked: all-in, or strictly positive.
    pub fn is_positive(&self) -> bool {
        match self {
            WagerAmount::AllIn => true,
            WagerAmount::Fixed(d) => *d > Decimal::ZERO,
        }
    }
}

impl fmt::Display for WagerAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerAmount::AllIn => write!(f, "all-in"),
            WagerAmount::Fixed(d) => write!(f, "{d}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Player & account
// ---------------------------------------------------------------------------

/// Bank account categories known to the persistence layer.
///
/// Betting only ever touches the spendings account; other kinds exist in
/// storage but are not loaded by this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    Spendings,
    Savings,
}

impl AccountKind {
    /// Storage tag for this account kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Spendings => "SPENDINGS",
            AccountKind::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SPENDINGS" => Ok(AccountKind::Spendings),
            "SAVINGS" => Ok(AccountKind::Savings),
            _ => Err(anyhow::anyhow!("Unknown account kind: {s}")),
        }
    }
}

/// A balance record as an immutable value. Updates happen by building
/// a replacement value, never by writing through a shared reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub kind: AccountKind,
    /// Balance in minor currency units (integer cents).
    pub balance_minor: i64,
}

impl BankAccount {
    pub fn spendings(balance_minor: i64) -> Self {
        Self {
            kind: AccountKind::Spendings,
            balance_minor,
        }
    }
}

/// A player known to the current process.
///
/// Identity (`id`, `external_id`) is owned by persistence; `funds_at_risk`
/// and `previous_position` live only in the roster cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable persistent identifier.
    pub id: String,
    /// Chat-platform user identifier, unique within the system.
    pub external_id: String,
    pub display_name: String,
    /// The spendings account record.
    pub account: BankAccount,
    /// Sum of this player's pending wagers in the current round, minor units.
    pub funds_at_risk: i64,
    /// Balance snapshot captured when the player joined the round.
    pub previous_position: i64,
}

impl Player {
    /// Current spendings balance in minor units.
    pub fn balance_minor(&self) -> i64 {
        self.account.balance_minor
    }

    /// Produce the player value that results from staking `stake_minor`.
    ///
    /// The account record is rebuilt rather than mutated in place, so no
    /// caller can observe a half-applied wager through a shared alias.
    pub fn with_wager_applied(&self, stake_minor: i64) -> Player {
        Player {
            account: BankAccount {
                kind: self.account.kind,
                balance_minor: self.account.balance_minor - stake_minor,
            },
            funds_at_risk: self.funds_at_risk + stake_minor,
            ..self.clone()
        }
    }

    /// Helper to build a test player with sensible defaults.
    #[cfg(test)]
    pub fn sample(external_id: &str, balance_minor: i64) -> Self {
        Player {
            id: format!("player-{external_id}"),
            external_id: external_id.to_string(),
            display_name: format!("Player {external_id}"),
            account: BankAccount::spendings(balance_minor),
            funds_at_risk: 0,
            previous_position: 0,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) balance={} at_risk={}",
            self.display_name,
            self.external_id,
            format_usd(self.balance_minor()),
            format_usd(self.funds_at_risk),
        )
    }
}

// ---------------------------------------------------------------------------
// Bet
// ---------------------------------------------------------------------------

/// Lifecycle state of a placed bet. This engine only ever creates
/// `Pending`; resolution to the other states happens elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetState {
    Pending,
    Won,
    Lost,
    Void,
}

impl BetState {
    /// Storage tag for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            BetState::Pending => "PENDING",
            BetState::Won => "WON",
            BetState::Lost => "LOST",
            BetState::Void => "VOID",
        }
    }
}

impl fmt::Display for BetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BetState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BetState::Pending),
            "WON" => Ok(BetState::Won),
            "LOST" => Ok(BetState::Lost),
            "VOID" => Ok(BetState::Void),
            _ => Err(anyhow::anyhow!("Unknown bet state: {s}")),
        }
    }
}

/// A persisted wager, created once and never mutated by this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    /// The wagered-on outcome category key, e.g. "17" or "red".
    pub selector: String,
    /// Stake in minor currency units, always > 0.
    pub amount_minor: i64,
    pub state: BetState,
    pub player_id: String,
    pub round_id: String,
    pub placed_at: DateTime<Utc>,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on '{}' ({}) [{}]",
            format_usd(self.amount_minor),
            self.selector,
            self.state,
            self.id,
        )
    }
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// Whether a round is accepting bets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    Open,
    Locked,
    Closed,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundStatus::Open => "OPEN",
            RoundStatus::Locked => "LOCKED",
            RoundStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time-boxed betting session. Lifecycle management is external; this
/// engine only reads the id and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: String,
    pub status: RoundStatus,
    pub opened_at: DateTime<Utc>,
}

impl Round {
    /// Build a fresh round in the `Open` state.
    pub fn open() -> Self {
        Round {
            id: uuid::Uuid::new_v4().to_string(),
            status: RoundStatus::Open,
            opened_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {} [{}]", self.id, self.status)
    }
}

// ---------------------------------------------------------------------------
// Money formatting
// ---------------------------------------------------------------------------

/// Format a minor-unit amount as a user-facing dollar figure,
/// e.g. `123456` -> `$1,234.56`.
pub fn format_usd(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let cents = abs % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents:02}")
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific failure modes of bet processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BetError {
    #[error("no active round")]
    NoActiveRound,

    #[error("round is not accepting bets")]
    RoundLocked,

    #[error("invalid bet")]
    InvalidBet,

    #[error("insufficient funds: need {needed_minor} minor units, have {available_minor}")]
    InsufficientFunds {
        needed_minor: i64,
        available_minor: i64,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
