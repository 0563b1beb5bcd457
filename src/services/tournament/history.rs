//! Local tournament history
//!
//! Secondary record of settled runs in Postgres, for dashboards and
//! operator queries. The chain record is authoritative; callers treat
//! failures here as log-and-continue.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::models::tournament::{MatchOutcome, TournamentResult};
use crate::utils::match_id;

pub struct TournamentHistory {
    pool: PgPool,
}

impl TournamentHistory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the history tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tournaments (
                id BIGSERIAL PRIMARY KEY,
                hour_bucket BIGINT NOT NULL,
                champion_id BIGINT NOT NULL,
                prize_pool NUMERIC NOT NULL,
                participant_count INT NOT NULL,
                round_count INT NOT NULL,
                recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS battles (
                match_id BIGINT PRIMARY KEY,
                round INT NOT NULL,
                winner_id BIGINT NOT NULL,
                loser_id BIGINT NOT NULL,
                is_champ BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert one settled run: a summary row plus one row per battle. The
    /// champion's deciding battle is flagged.
    pub async fn record(
        &self,
        result: &TournamentResult,
        started_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO tournaments
                (hour_bucket, champion_id, prize_pool, participant_count, round_count)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(match_id::hour_bucket(started_at))
        .bind(result.champion)
        .bind(result.prize_pool)
        .bind(result.participants as i32)
        .bind(result.rounds as i32)
        .execute(&mut *tx)
        .await?;

        let final_match = result.battles.last().map(|b| b.match_id);
        for battle in &result.battles {
            // A malformed id is fatal to this decode only, not to the run.
            let round = match match_id::decode(battle.match_id) {
                Ok(parts) => parts.round as i32,
                Err(err) => {
                    warn!("battle {} has an undecodable id: {}", battle.match_id, err);
                    0
                }
            };

            sqlx::query(
                r#"
                INSERT INTO battles (match_id, round, winner_id, loser_id, is_champ)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (match_id) DO NOTHING
                "#,
            )
            .bind(battle.match_id)
            .bind(round)
            .bind(battle.winner)
            .bind(battle.loser)
            .bind(Some(battle.match_id) == final_match)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let today = self.battles_on(started_at.date_naive()).await?;
        info!(
            "recorded tournament locally: {} battles this run, {} today, champion {}",
            result.battles.len(),
            today.len(),
            result.champion
        );
        Ok(())
    }

    /// All battles fought on `date`, in match-id order. Uses the codec's
    /// day bounds, so this is a pure range scan on the primary key.
    pub async fn battles_on(&self, date: NaiveDate) -> Result<Vec<MatchOutcome>, sqlx::Error> {
        let (low, high) = match_id::day_range(date);

        let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT match_id, winner_id, loser_id
            FROM battles
            WHERE match_id BETWEEN $1 AND $2
            ORDER BY match_id
            "#,
        )
        .bind(low)
        .bind(high)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(match_id, winner, loser)| MatchOutcome { match_id, winner, loser })
            .collect())
    }
}
