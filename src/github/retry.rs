use crate::config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Delay before retry number `attempt` (1-based): base * 2^(attempt-1)
/// plus up to one base of jitter.
fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.backoff_base_ms;
    let scaled = base.saturating_mul(1u64 << attempt.saturating_sub(1).min(16));
    let jitter = if base == 0 {
        0
    } else {
        rand::random::<u64>() % base
    };
    Duration::from_millis(scaled.saturating_add(jitter))
}

/// Run `operation` until it succeeds or `max_attempts` calls have failed.
///
/// `what` names the call in log lines.
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    what: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= max_attempts => {
                warn!("{}: giving up after {} attempts: {}", what, attempt, e);
                return Err(e);
            }
            Err(e) => {
                let delay = backoff_delay(config, attempt);
                warn!(
                    "{}: attempt {} failed: {}. Retrying in {:?}",
                    what, attempt, e, delay
                );
                sleep(delay).await;
            }
        }
    }
}
