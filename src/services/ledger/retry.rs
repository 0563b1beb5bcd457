//! Bounded retry with linear backoff
//!
//! A small combinator instead of exception-driven control flow: each
//! attempt returns an explicit `Result`, retryable failures sleep
//! `base_delay * attempt` and go again, fatal failures and exhaustion
//! surface immediately to the caller.

use std::future::Future;

use tokio::time::sleep;
use tracing::{info, warn};

use super::types::{LedgerError, RetryPolicy};

/// Drive `call` to success or terminal failure under `policy`.
///
/// `operation` names the logical write for logging and for the
/// `WriteFailed` error the caller receives after the last attempt.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, LedgerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LedgerError>>,
{
    let max_attempts = policy.max_retries.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match call().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{} succeeded on attempt {}", operation, attempt);
                }
                return Ok(value);
            }
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) => {
                warn!(
                    "attempt {} of {} for {} failed: {}",
                    attempt, max_attempts, operation, err
                );

                if attempt >= max_attempts {
                    return Err(LedgerError::WriteFailed {
                        operation: operation.to_string(),
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }

                sleep(policy.base_delay * attempt).await;
            }
        }
    }
}
