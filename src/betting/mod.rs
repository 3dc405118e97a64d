//! Wager validation and amount normalization.

pub mod normalize;
pub mod validate;

pub use normalize::{normalize, to_minor_units};
pub use validate::BetValidator;
