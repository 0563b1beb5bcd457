//! Ledger Module
//!
//! Everything that crosses the boundary to the external ledger:
//! - collaborator traits for the fighter registry and the ledger itself
//! - a bounded-retry combinator with linear backoff
//! - the `LedgerWriter`, which wraps each write in a timeout and the retry
//!   policy
//!
//! Delivery is at-least-once: each logical write retries independently and
//! a failure in one never rolls back a prior success. Idempotency is the
//! ledger's responsibility, keyed by match id.

pub mod retry;
pub mod types;
pub mod writer;

pub use types::{LedgerError, RetryPolicy};
pub use writer::LedgerWriter;

use rust_decimal::Decimal;

use crate::models::tournament::{BattleRecord, FighterId, FighterState};

/// Read side of the arena: the roster source and the stake parameter.
pub trait FighterRegistry {
    /// Ordered ids of all fighters currently in `state`.
    fn fighters_by_state(
        &self,
        state: FighterState,
    ) -> impl std::future::Future<Output = Result<Vec<FighterId>, LedgerError>> + Send;

    /// Stake required for the current run, in whole tokens.
    fn required_stake(&self)
        -> impl std::future::Future<Output = Result<Decimal, LedgerError>> + Send;
}

/// Write side of the arena. Implementations return the transaction hash of
/// the submitted write; they do not wait for finality beyond the receipt.
pub trait LedgerBackend {
    fn update_fighter_states(
        &self,
        fighters: &[FighterId],
        states: &[FighterState],
    ) -> impl std::future::Future<Output = Result<String, LedgerError>> + Send;

    fn add_to_balances(
        &self,
        fighters: &[FighterId],
        amounts: &[Decimal],
    ) -> impl std::future::Future<Output = Result<String, LedgerError>> + Send;

    fn record_tournament(
        &self,
        record: &BattleRecord,
    ) -> impl std::future::Future<Output = Result<String, LedgerError>> + Send;
}
