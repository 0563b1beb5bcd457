//! Tournament settlement run

use chrono::{NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::models::tournament::{BattleRecord, FighterId, FighterState};
use crate::services::bracket;
use crate::services::ledger::{FighterRegistry, LedgerBackend, LedgerWriter};

use super::history::TournamentHistory;
use super::types::{TournamentError, TournamentRunReport};

/// One tournament invocation. The design assumes at most one run per UTC
/// hour, so concurrent runs never share a match-id bucket.
pub struct TournamentService<R, B> {
    registry: R,
    writer: LedgerWriter<B>,
    history: Option<TournamentHistory>,
}

impl<R, B> TournamentService<R, B>
where
    R: FighterRegistry,
    B: LedgerBackend,
{
    pub fn new(registry: R, writer: LedgerWriter<B>, history: Option<TournamentHistory>) -> Self {
        Self { registry, writer, history }
    }

    /// Run one tournament and settle it. Returns `Ok(None)` when fewer than
    /// two fighters are eligible — nothing is written and the next scheduled
    /// run will simply try again.
    pub async fn run(&self) -> Result<Option<TournamentRunReport>, TournamentError> {
        self.run_with_rng(&mut StdRng::from_entropy()).await
    }

    /// Same as [`run`](Self::run) with an injected rng, so tests can drive
    /// a deterministic bracket.
    pub async fn run_with_rng<G: Rng>(
        &self,
        rng: &mut G,
    ) -> Result<Option<TournamentRunReport>, TournamentError> {
        let stake = self.registry.required_stake().await?;
        let roster = self.registry.fighters_by_state(FighterState::Alive).await?;
        info!("{} eligible fighters, stake {}", roster.len(), stake);

        if roster.len() < 2 {
            warn!("not enough fighters for a tournament, skipping run");
            return Ok(None);
        }

        // The bracket runs to a champion before any ledger write, so an
        // abort here never leaves a partially settled tournament.
        let started_at = Utc::now();
        let result = bracket::run_bracket(&roster, stake, started_at, rng)?;

        for battle in &result.battles {
            info!(
                "match {}: winner {}, loser {}",
                battle.match_id, battle.winner, battle.loser
            );
        }
        for (fighter, delta) in &result.balance_deltas {
            info!("fighter {}: {:.2}", fighter, delta);
        }
        info!("grand prize pool: {:.2}, champion: {}", result.prize_pool, result.champion);

        let dead: Vec<FighterId> = result.dead_fighters.iter().copied().collect();
        let states = vec![FighterState::Eliminated; dead.len()];
        self.writer.update_fighter_states(&dead, &states).await?;

        let (credit_ids, credit_amounts): (Vec<FighterId>, Vec<Decimal>) =
            result.balance_deltas.iter().map(|(f, d)| (*f, *d)).unzip();
        self.writer.add_to_balances(&credit_ids, &credit_amounts).await?;

        let as_of = started_at.date_naive().and_time(NaiveTime::MIN).and_utc();
        let record = BattleRecord::from_result(&result, as_of);
        self.writer.record_tournament(&record).await?;

        // Best effort: the chain record above is authoritative, a local
        // history failure must not fail the settled run.
        if let Some(history) = &self.history {
            if let Err(err) = history.record(&result, started_at).await {
                error!("failed to record tournament history locally: {}", err);
            }
        }

        Ok(Some(TournamentRunReport {
            champion: result.champion,
            participants: result.participants,
            rounds: result.rounds,
            total_matches: result.total_matches(),
            prize_pool: result.prize_pool,
        }))
    }
}
