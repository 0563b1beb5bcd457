//! Bracket Engine
//!
//! Pure single-elimination bracket: `(roster, stake, created_at, rng)` in,
//! `TournamentResult` out. All accumulators are threaded explicitly so a
//! seeded rng reproduces a run exactly; nothing here touches the ledger.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::tournament::{FighterId, MatchOutcome, TournamentResult};
use crate::utils::match_id;

use super::settlement;
use super::types::BracketError;

/// Run a tournament to completion.
///
/// Pairing is a uniform shuffle per round; each match winner is a 50/50
/// coin flip, independent of prior performance. An odd roster leaves the
/// last shuffled fighter to advance with no match and no credit. Winners
/// are credited `stake / 2` per match, the same amount accrues to the prize
/// pool, and the champion receives the whole pool on top. Losers are never
/// debited; the credited half-stake is the ledger's liability, not a
/// transfer between fighters.
pub fn run_bracket<R: Rng>(
    roster: &[FighterId],
    stake: Decimal,
    created_at: DateTime<Utc>,
    rng: &mut R,
) -> Result<TournamentResult, BracketError> {
    if roster.len() < 2 {
        return Err(BracketError::InsufficientRoster(roster.len()));
    }

    let stake_half = stake / Decimal::TWO;
    let mut battles: Vec<MatchOutcome> = Vec::with_capacity(roster.len() - 1);
    let mut current: Vec<FighterId> = roster.to_vec();
    let mut round = 0u32;

    while current.len() > 1 {
        round += 1;
        current.shuffle(rng);

        let mut next = Vec::with_capacity(current.len() / 2 + 1);
        let mut sequence = 0u32;

        for pair in current.chunks(2) {
            let &[a, b] = pair else {
                // Odd fighter out advances automatically, after this
                // round's winners.
                next.push(pair[0]);
                continue;
            };

            sequence += 1;
            let (winner, loser) = if rng.gen_range(0..2) == 0 { (a, b) } else { (b, a) };
            let match_id = match_id::encode(created_at, round, sequence)?;

            battles.push(MatchOutcome { match_id, winner, loser });
            next.push(winner);
        }

        current = next;
    }

    let champion = current[0];
    let prize_pool = stake_half * Decimal::from(battles.len() as u64);
    let dead_fighters = settlement::collect_dead_fighters(&battles);
    let balance_deltas =
        settlement::collect_balance_deltas(&battles, stake_half, champion, prize_pool);

    Ok(TournamentResult {
        battles,
        dead_fighters,
        balance_deltas,
        prize_pool,
        champion,
        rounds: round,
        participants: roster.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap()
    }

    fn run(n: i64, stake: Decimal, seed: u64) -> TournamentResult {
        let roster: Vec<FighterId> = (1..=n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        run_bracket(&roster, stake, at(), &mut rng).unwrap()
    }

    #[test]
    fn test_rejects_insufficient_roster() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            run_bracket(&[], dec!(10), at(), &mut rng),
            Err(BracketError::InsufficientRoster(0))
        );
        assert_eq!(
            run_bracket(&[7], dec!(10), at(), &mut rng),
            Err(BracketError::InsufficientRoster(1))
        );
    }

    #[test]
    fn test_match_count_and_round_count() {
        for n in 2..=64 {
            let result = run(n, dec!(10), n as u64);
            assert_eq!(result.battles.len() as i64, n - 1, "roster {}", n);
            let expected_rounds = (n as f64).log2().ceil() as u32;
            assert_eq!(result.rounds, expected_rounds, "roster {}", n);
            assert_eq!(result.dead_fighters.len() as i64, n - 1);
            assert!(!result.dead_fighters.contains(&result.champion));
        }
    }

    #[test]
    fn test_identifiers_strictly_increase() {
        let result = run(33, dec!(10), 9);
        for pair in result.battles.windows(2) {
            assert!(pair[0].match_id < pair[1].match_id);
        }
    }

    #[test]
    fn test_two_fighter_bracket_single_round() {
        let result = run(2, dec!(6), 3);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.battles.len(), 1);
        assert_eq!(result.prize_pool, dec!(3));
        // Champion gets the match credit plus the whole pool.
        assert_eq!(result.balance_deltas[&result.champion], dec!(6));
        assert_eq!(result.balance_deltas.len(), 1);
    }

    #[test]
    fn test_five_fighter_scenario() {
        // Roster of 5, stake 10: rounds of 2+auto, 1+auto, 1 matches.
        let result = run(5, dec!(10), 42);
        assert_eq!(result.rounds, 3);
        assert_eq!(result.battles.len(), 4);
        assert_eq!(result.prize_pool, dec!(20));

        let total: Decimal = result.balance_deltas.values().sum();
        // Four match credits of 5 plus the pool bonus of 20.
        assert_eq!(total, dec!(40));
    }

    #[test]
    fn test_auto_advance_has_no_match_and_no_credit() {
        let result = run(3, dec!(10), 7);
        // Round 1: one match, one bye. Round 2: the final.
        assert_eq!(result.rounds, 2);
        assert_eq!(result.battles.len(), 2);

        let round1 = result.battles[0];
        let bye: Vec<FighterId> = (1..=3)
            .filter(|f| *f != round1.winner && *f != round1.loser)
            .collect();
        assert_eq!(bye.len(), 1);
        // The bye fighter earned nothing in round 1; any delta it has must
        // come from winning the final.
        if let Some(delta) = result.balance_deltas.get(&bye[0]) {
            assert_eq!(result.battles[1].winner, bye[0]);
            let expected = if result.champion == bye[0] {
                dec!(5) + result.prize_pool
            } else {
                dec!(5)
            };
            assert_eq!(*delta, expected);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = run(16, dec!(10), 1234);
        let b = run(16, dec!(10), 1234);
        assert_eq!(a.battles, b.battles);
        assert_eq!(a.champion, b.champion);
        assert_eq!(a.balance_deltas, b.balance_deltas);
    }

    #[test]
    fn test_zero_stake_runs_clean() {
        let result = run(8, dec!(0), 5);
        assert_eq!(result.prize_pool, dec!(0));
        assert!(result.balance_deltas.is_empty());
    }
}
