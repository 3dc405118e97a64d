//! End-to-end betting workflow tests.
//!
//! Drives the full engine (validation, resolution, settlement,
//! notification) against the in-process store and a recording notifier,
//! with no external dependencies.

use std::sync::Arc;
use std::time::Duration;

use croupier::config::BettingOptions;
use croupier::engine::{BetEngine, BetOutcome, BetRequest, EngineSettings};
use croupier::roster::Roster;
use croupier::rounds::RoundTracker;
use croupier::store::memory::MemoryStore;
use croupier::types::{BetError, BetState, RoundStatus};

use super::mock_collab::RecordingNotifier;

struct Harness {
    engine: BetEngine,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
    roster: Arc<Roster>,
    rounds: Arc<RoundTracker>,
}

fn harness_with_store(store: Arc<MemoryStore>) -> Harness {
    let notifier = Arc::new(RecordingNotifier::new());
    let roster = Arc::new(Roster::new());
    let rounds = Arc::new(RoundTracker::new());
    let engine = BetEngine::new(
        BettingOptions::standard(),
        store.clone(),
        notifier.clone(),
        roster.clone(),
        rounds.clone(),
        EngineSettings::default(),
    );
    Harness {
        engine,
        store,
        notifier,
        roster,
        rounds,
    }
}

fn harness() -> Harness {
    harness_with_store(Arc::new(MemoryStore::new(100_000)))
}

fn request(external_id: &str, amount: &str, selector: &str) -> BetRequest {
    BetRequest {
        external_id: external_id.to_string(),
        display_name: format!("Player {external_id}"),
        guild_id: Some("g1".to_string()),
        amount: amount.to_string(),
        selector: selector.to_string(),
    }
}

#[tokio::test]
async fn test_all_in_bet_from_unknown_player() {
    let h = harness();
    h.rounds.open_round();

    // unknown player goes all-in on a straight number
    let outcome = h.engine.process(&request("u1", "all", "17")).await;

    let bet = match outcome {
        BetOutcome::Placed(bet) => bet,
        other => panic!("expected placed bet, got {other:?}"),
    };
    assert_eq!(bet.amount_minor, 100_000);
    assert_eq!(bet.state, BetState::Pending);

    let player = h.roster.get("u1").unwrap();
    assert_eq!(player.balance_minor(), 0);
    assert_eq!(player.funds_at_risk, 100_000);
    assert_eq!(player.previous_position, 100_000);

    // the only message is the registration grant
    let texts = h.notifier.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("$1,000.00"));
}

#[tokio::test]
async fn test_unknown_selector_stops_before_player_lookup() {
    let h = harness();
    h.rounds.open_round();

    let outcome = h.engine.process(&request("u1", "25", "99")).await;

    assert!(matches!(outcome, BetOutcome::Rejected(BetError::InvalidBet)));
    assert_eq!(h.store.player_count(), 0);
    assert!(h.store.bets().is_empty());
    assert!(h.roster.is_empty());
    assert_eq!(h.notifier.texts(), vec!["that was an invalid bet, please try again."]);
}

#[tokio::test]
async fn test_non_numeric_amount_rejected() {
    let h = harness();
    h.rounds.open_round();

    let outcome = h.engine.process(&request("u1", "abc", "17")).await;

    assert!(matches!(outcome, BetOutcome::Rejected(BetError::InvalidBet)));
    assert!(h.store.bets().is_empty());
}

#[tokio::test]
async fn test_two_sequential_bets_accumulate() {
    let store = Arc::new(MemoryStore::new(1000));
    let h = harness_with_store(store);
    h.rounds.open_round();

    let first = h.engine.process(&request("u1", "5", "red")).await;
    let second = h.engine.process(&request("u1", "3", "black")).await;
    assert!(first.is_placed());
    assert!(second.is_placed());

    let player = h.roster.get("u1").unwrap();
    assert_eq!(player.balance_minor(), 200);
    assert_eq!(player.funds_at_risk, 800);
    assert_eq!(h.store.bets().len(), 2);
    assert_eq!(h.rounds.bets().len(), 2);
}

#[tokio::test]
async fn test_locked_round_only_notifies() {
    let h = harness();
    h.rounds.open_round();
    h.rounds.set_status(RoundStatus::Locked);

    let outcome = h.engine.process(&request("u1", "25", "17")).await;

    assert!(matches!(outcome, BetOutcome::Rejected(BetError::RoundLocked)));
    assert_eq!(h.store.player_count(), 0);
    assert!(h.store.bets().is_empty());
    assert_eq!(h.notifier.count(), 1);
    assert!(h.notifier.texts()[0].contains("locked"));
}

#[tokio::test]
async fn test_no_round_only_notifies() {
    let h = harness();

    let outcome = h.engine.process(&request("u1", "25", "17")).await;

    assert!(matches!(outcome, BetOutcome::Rejected(BetError::NoActiveRound)));
    assert_eq!(h.store.player_count(), 0);
    assert_eq!(h.notifier.count(), 1);
    assert!(h.notifier.texts()[0].contains("no active roulette round"));
}

#[tokio::test]
async fn test_insufficient_funds_keeps_state() {
    let store = Arc::new(MemoryStore::new(1000));
    let h = harness_with_store(store);
    h.rounds.open_round();

    // $25.00 against a $10.00 balance
    let outcome = h.engine.process(&request("u1", "25", "17")).await;

    assert!(matches!(
        outcome,
        BetOutcome::Rejected(BetError::InsufficientFunds { .. })
    ));
    let player = h.roster.get("u1").unwrap();
    assert_eq!(player.balance_minor(), 1000);
    assert_eq!(player.funds_at_risk, 0);
    assert!(h.store.bets().is_empty());
    assert!(h
        .notifier
        .texts()
        .iter()
        .any(|t| t.contains("not have enough funds")));
}

#[tokio::test]
async fn test_cached_player_resolution_is_quiet() {
    let h = harness();
    h.rounds.open_round();

    h.engine.process(&request("u1", "5", "red")).await;
    let registered_messages = h.notifier.count();

    // second bet: the player is cached, no fresh registration or notice
    let outcome = h.engine.process(&request("u1", "5", "red")).await;
    assert!(outcome.is_placed());
    assert_eq!(h.store.player_count(), 1);
    assert_eq!(h.notifier.count(), registered_messages);
}

#[tokio::test]
async fn test_persistence_failure_notifies_and_aborts() {
    let h = harness();
    h.rounds.open_round();
    h.store.set_error("db offline");

    let outcome = h.engine.process(&request("u1", "25", "17")).await;

    assert!(matches!(outcome, BetOutcome::Rejected(BetError::Storage(_))));
    assert!(h.roster.is_empty());
    assert!(h.store.bets().is_empty());
    assert!(h
        .notifier
        .texts()
        .iter()
        .any(|t| t.contains("something went wrong")));
}

#[tokio::test]
async fn test_bet_creation_failure_leaves_roster_intact() {
    let h = harness();
    h.rounds.open_round();

    // register via a first successful bet
    h.engine.process(&request("u1", "5", "red")).await;
    let before = h.roster.get("u1").unwrap();

    h.store.set_error("db offline");
    let outcome = h.engine.process(&request("u1", "5", "red")).await;

    assert!(matches!(outcome, BetOutcome::Rejected(BetError::Storage(_))));
    assert_eq!(h.roster.get("u1").unwrap(), before);
    assert_eq!(h.store.bets().len(), 1);
    assert_eq!(h.rounds.bets().len(), 1);
}

#[tokio::test]
async fn test_notifier_outage_does_not_break_processing() {
    let h = harness();
    h.rounds.open_round();
    h.notifier.set_error("transport down");

    let outcome = h.engine.process(&request("u1", "5", "red")).await;

    // the grant notice fails silently; the bet still lands
    assert!(outcome.is_placed());
    assert_eq!(h.store.bets().len(), 1);
}

#[tokio::test]
async fn test_concurrent_all_ins_cannot_double_spend() {
    // store latency widens the window between balance check and update
    let store = Arc::new(MemoryStore::with_latency(
        100_000,
        Duration::from_millis(20),
    ));
    let h = harness_with_store(store);
    h.rounds.open_round();

    // join first so both wagers race on the cached balance
    h.engine.process(&request("u1", "1", "red")).await;

    let requests = vec![request("u1", "all", "17"), request("u1", "all", "red")];
    let outcomes = h.engine.process_many(&requests).await;

    let placed = outcomes.iter().filter(|o| o.is_placed()).count();
    assert_eq!(placed, 1);
    assert!(outcomes.iter().any(|o| matches!(
        o,
        BetOutcome::Rejected(BetError::InsufficientFunds { .. })
    )));

    let player = h.roster.get("u1").unwrap();
    assert_eq!(player.balance_minor(), 0);
    assert_eq!(player.funds_at_risk, 100_000);
}

#[tokio::test]
async fn test_different_players_interleave_freely() {
    let h = harness();
    h.rounds.open_round();

    let requests: Vec<BetRequest> = (0..5)
        .map(|i| request(&format!("u{i}"), "10", "red"))
        .collect();
    let outcomes = h.engine.process_many(&requests).await;

    assert!(outcomes.iter().all(|o| o.is_placed()));
    assert_eq!(h.roster.len(), 5);
    assert_eq!(h.store.bets().len(), 5);
    for i in 0..5 {
        let player = h.roster.get(&format!("u{i}")).unwrap();
        assert_eq!(player.balance_minor(), 99_000);
        assert_eq!(player.funds_at_risk, 1000);
    }
}
