//! Ledger Writer
//!
//! Pushes the three settlement writes to the external ledger. Every call is
//! bounded by the configured timeout (a timeout counts as a retryable
//! failure) and wrapped in the retry policy. The three writes are not
//! transactional with each other: a failure in one leaves earlier writes
//! applied, and the caller must tolerate partial application.

use std::future::Future;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::info;

use crate::models::tournament::{BattleRecord, FighterId, FighterState};

use super::retry::with_retry;
use super::types::{LedgerError, RetryPolicy};
use super::LedgerBackend;

pub struct LedgerWriter<B> {
    backend: B,
    policy: RetryPolicy,
    call_timeout: Duration,
}

impl<B: LedgerBackend> LedgerWriter<B> {
    pub fn new(backend: B, policy: RetryPolicy, call_timeout: Duration) -> Self {
        Self { backend, policy, call_timeout }
    }

    /// Mark eliminated fighters with their new state code.
    pub async fn update_fighter_states(
        &self,
        fighters: &[FighterId],
        states: &[FighterState],
    ) -> Result<String, LedgerError> {
        if fighters.len() != states.len() {
            return Err(LedgerError::BatchMismatch { ids: fighters.len(), values: states.len() });
        }

        info!("updating states for {} fighters", fighters.len());
        self.write("update_fighter_states", || {
            self.backend.update_fighter_states(fighters, states)
        })
        .await
    }

    /// Apply the non-zero balance deltas of one run.
    pub async fn add_to_balances(
        &self,
        fighters: &[FighterId],
        amounts: &[Decimal],
    ) -> Result<String, LedgerError> {
        if fighters.len() != amounts.len() {
            return Err(LedgerError::BatchMismatch { ids: fighters.len(), values: amounts.len() });
        }

        info!("crediting balances for {} fighters", fighters.len());
        self.write("add_to_balances", || self.backend.add_to_balances(fighters, amounts))
            .await
    }

    /// Persist the battle-record batch and champion marker.
    pub async fn record_tournament(&self, record: &BattleRecord) -> Result<String, LedgerError> {
        info!("recording {} battles", record.match_ids.len());
        self.write("record_tournament", || self.backend.record_tournament(record))
            .await
    }

    async fn write<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, LedgerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LedgerError>>,
    {
        let timeout_secs = self.call_timeout.as_secs();
        with_retry(&self.policy, operation, || {
            let fut = call();
            async move {
                match tokio::time::timeout(self.call_timeout, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(LedgerError::Timeout(timeout_secs)),
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Backend that fails a configurable number of times per operation
    /// before succeeding.
    struct FlakyBackend {
        failures_before_success: u32,
        calls: AtomicU32,
        hang: bool,
    }

    impl FlakyBackend {
        fn failing(failures_before_success: u32) -> Self {
            Self { failures_before_success, calls: AtomicU32::new(0), hang: false }
        }

        fn hanging() -> Self {
            Self { failures_before_success: u32::MAX, calls: AtomicU32::new(0), hang: true }
        }

        async fn attempt(&self) -> Result<String, LedgerError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if call < self.failures_before_success {
                Err(LedgerError::Rpc("transient".into()))
            } else {
                Ok(format!("0xtx{call}"))
            }
        }
    }

    impl LedgerBackend for FlakyBackend {
        async fn update_fighter_states(
            &self,
            _fighters: &[FighterId],
            _states: &[FighterState],
        ) -> Result<String, LedgerError> {
            self.attempt().await
        }

        async fn add_to_balances(
            &self,
            _fighters: &[FighterId],
            _amounts: &[Decimal],
        ) -> Result<String, LedgerError> {
            self.attempt().await
        }

        async fn record_tournament(&self, _record: &BattleRecord) -> Result<String, LedgerError> {
            self.attempt().await
        }
    }

    fn writer(backend: FlakyBackend) -> LedgerWriter<FlakyBackend> {
        LedgerWriter::new(
            backend,
            RetryPolicy::new(3, Duration::from_millis(1)),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn test_write_recovers_from_transient_failures() {
        let w = writer(FlakyBackend::failing(2));
        let tx = w.update_fighter_states(&[2, 4], &[FighterState::Eliminated; 2]).await.unwrap();
        assert_eq!(tx, "0xtx2");
        assert_eq!(w.backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_write_gives_up_after_max_retries() {
        let w = writer(FlakyBackend::failing(u32::MAX));
        let err = w.add_to_balances(&[1], &[dec!(5)]).await.unwrap_err();
        assert_eq!(w.backend.calls.load(Ordering::SeqCst), 3);
        match err {
            LedgerError::WriteFailed { operation, attempts, .. } => {
                assert_eq!(operation, "add_to_balances");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_treated_as_retryable() {
        let w = writer(FlakyBackend::hanging());
        let record = BattleRecord {
            as_of: Utc::now(),
            match_ids: vec![250307140100000001],
            winner_ids: vec![1],
            loser_ids: vec![2],
            champion_id: 1,
        };

        let err = w.record_tournament(&record).await.unwrap_err();
        // Every attempt timed out; all three were made.
        assert_eq!(w.backend.calls.load(Ordering::SeqCst), 3);
        match err {
            LedgerError::WriteFailed { attempts, source, .. } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*source, LedgerError::Timeout(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batch_mismatch_fails_without_calling_backend() {
        let w = writer(FlakyBackend::failing(0));
        let err = w
            .update_fighter_states(&[1, 2], &[FighterState::Eliminated])
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::BatchMismatch { ids: 2, values: 1 }));
        assert_eq!(w.backend.calls.load(Ordering::SeqCst), 0);
    }
}
