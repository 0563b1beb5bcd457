//! Tournament run errors and report

use rust_decimal::Decimal;

use crate::models::tournament::FighterId;
use crate::services::bracket::BracketError;
use crate::services::ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("bracket failed: {0}")]
    Bracket(#[from] BracketError),

    #[error("ledger write failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// Summary of a completed run, for the caller's logging and alerting.
#[derive(Debug, Clone)]
pub struct TournamentRunReport {
    pub champion: FighterId,
    pub participants: usize,
    pub rounds: u32,
    pub total_matches: usize,
    pub prize_pool: Decimal,
}
