//! Ledger errors and retry configuration

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The external call outlived the caller-supplied bound. Retryable.
    #[error("ledger call timed out after {0}s")]
    Timeout(u64),

    /// Transport or node failure reported by the ledger. Retryable.
    #[error("ledger rpc failure: {0}")]
    Rpc(String),

    /// Parallel batch arrays of different lengths. Programmer error, never
    /// retried.
    #[error("batch length mismatch: {ids} ids vs {values} values")]
    BatchMismatch { ids: usize, values: usize },

    /// A value that cannot be represented on the ledger side.
    #[error("amount not representable on the ledger: {0}")]
    AmountOutOfRange(String),

    /// Retries exhausted; carries the operation name and attempt count for
    /// the caller's alerting.
    #[error("{operation} failed after {attempts} attempt(s): {source}")]
    WriteFailed {
        operation: String,
        attempts: u32,
        #[source]
        source: Box<LedgerError>,
    },
}

impl LedgerError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Timeout(_) | LedgerError::Rpc(_))
    }
}

/// Bounded-retry configuration for ledger writes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed per operation, including the first.
    pub max_retries: u32,
    /// Backoff unit; attempt `n` sleeps `base_delay * n` before retrying.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries: max_retries.max(1), base_delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, base_delay: Duration::from_millis(1000) }
    }
}
