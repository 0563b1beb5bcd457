//! Tournament domain types
//!
//! The core is stateless: balances exist only as deltas to apply to the
//! external ledger, and a `TournamentResult` is immutable once the bracket
//! has run to completion.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque fighter identity as known to the arena contract.
pub type FighterId = i64;

/// On-ledger fighter state codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum FighterState {
    Eliminated = 0,
    Alive = 1,
}

impl FighterState {
    /// Numeric code used by the ledger contract.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// A single decided match. Immutable once created; `match_id` is assigned
/// at creation time and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_id: i64,
    pub winner: FighterId,
    pub loser: FighterId,
}

/// Terminal aggregate of one tournament run.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentResult {
    /// All match outcomes across all rounds, in emission order.
    pub battles: Vec<MatchOutcome>,
    /// Fighters eliminated during the run.
    pub dead_fighters: BTreeSet<FighterId>,
    /// Net balance delta per fighter. Fighters with a zero delta are absent.
    pub balance_deltas: BTreeMap<FighterId, Decimal>,
    /// Accumulated stake-halves, awarded in full to the champion on top of
    /// per-match credits.
    pub prize_pool: Decimal,
    pub champion: FighterId,
    pub rounds: u32,
    pub participants: usize,
}

impl TournamentResult {
    pub fn total_matches(&self) -> usize {
        self.battles.len()
    }
}

/// Battle-record batch as the ledger contract expects it: parallel arrays
/// plus the champion marker.
#[derive(Debug, Clone)]
pub struct BattleRecord {
    /// UTC midnight of the tournament day.
    pub as_of: DateTime<Utc>,
    pub match_ids: Vec<i64>,
    pub winner_ids: Vec<FighterId>,
    pub loser_ids: Vec<FighterId>,
    pub champion_id: FighterId,
}

impl BattleRecord {
    pub fn from_result(result: &TournamentResult, as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            match_ids: result.battles.iter().map(|b| b.match_id).collect(),
            winner_ids: result.battles.iter().map(|b| b.winner).collect(),
            loser_ids: result.battles.iter().map(|b| b.loser).collect(),
            champion_id: result.champion,
        }
    }
}
