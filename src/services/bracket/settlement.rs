//! Settlement Aggregator
//!
//! Randomness-free folds over the match-outcome sequence. Split out of the
//! engine so the accounting rules can be tested without running a bracket.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::models::tournament::{FighterId, MatchOutcome};

/// Unique set of fighters eliminated by the given outcomes.
pub fn collect_dead_fighters(outcomes: &[MatchOutcome]) -> BTreeSet<FighterId> {
    outcomes.iter().map(|o| o.loser).collect()
}

/// Net balance delta per fighter: `stake_half` per match won, plus the
/// whole `prize_pool` for the champion. Fighters that end up with a zero
/// delta are omitted — the ledger balance write carries non-zero entries
/// only.
pub fn collect_balance_deltas(
    outcomes: &[MatchOutcome],
    stake_half: Decimal,
    champion: FighterId,
    prize_pool: Decimal,
) -> BTreeMap<FighterId, Decimal> {
    let mut deltas: BTreeMap<FighterId, Decimal> = BTreeMap::new();

    for outcome in outcomes {
        *deltas.entry(outcome.winner).or_insert(Decimal::ZERO) += stake_half;
    }
    *deltas.entry(champion).or_insert(Decimal::ZERO) += prize_pool;

    deltas.retain(|_, delta| !delta.is_zero());
    deltas
}
