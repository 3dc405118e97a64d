//! Core engine: the validate -> resolve -> settle bet workflow.

pub mod processor;
pub mod resolver;
pub mod settlement;

pub use processor::{BetEngine, BetOutcome, BetRequest, EngineSettings};
pub use resolver::PlayerResolver;
pub use settlement::Settlement;
