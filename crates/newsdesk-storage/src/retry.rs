//! Retry with exponential backoff for transient storage failures.

use std::future::Future;
use std::time::Duration;

use crate::error::StorageError;

/// Returns `true` if `err` is a transient condition worth retrying.
///
/// Retriable: network-level failures and 5xx responses. Everything else —
/// 404s, non-5xx statuses, serialization problems — would fail the same way
/// again and is propagated immediately.
fn is_retriable(err: &StorageError) -> bool {
    match err {
        StorageError::Http(_) => true,
        StorageError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, sleeping `backoff_base_secs * 2^attempt` seconds
/// between attempts, up to `max_retries` additional attempts after the
/// first. The last error is returned when retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorageError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                err
            }
        };

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient storage error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
