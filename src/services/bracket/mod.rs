//! Bracket Module
//!
//! Runs a full single-elimination bracket for one tournament:
//! 1. Random pairing round by round until a champion remains (engine)
//! 2. Folding match outcomes into balance deltas and the eliminated set
//!    (settlement aggregator)

pub mod engine;
pub mod settlement;
pub mod types;

pub use engine::run_bracket;
pub use types::BracketError;
