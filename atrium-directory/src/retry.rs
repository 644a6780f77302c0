//! Retry utilities with exponential backoff.
//!
//! Directory queries can fail transiently (network, store failover). This
//! module provides a backoff loop that retries only errors the caller
//! classifies as transient via [`crate::DirectoryError::is_retryable`].
//!
//! # Example
//!
//! ```rust,no_run
//! use atrium_directory::{with_retry, DirectoryResult, RetryConfig};
//!
//! async fn example() -> DirectoryResult<String> {
//!     let config = RetryConfig::standard();
//!
//!     with_retry(&config, || async {
//!         // Your directory call here
//!         Ok("success".to_string())
//!     }).await
//! }
//! ```

use std::time::Duration;

use tokio::time::sleep;

use crate::error::DirectoryResult;

/// Configuration for retry behavior.
///
/// Controls how many times to retry an operation and how long to wait
/// between retries.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,

    /// Initial delay before the first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Base for exponential backoff (typically 2.0)
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            exponential_base: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a configuration for fast retries.
    ///
    /// Suited to interactive paths where a short stall is better than a
    /// visible failure.
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
            exponential_base: 2.0,
        }
    }

    /// Create a configuration for standard retries.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Create a configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            exponential_base: 1.0,
        }
    }
}

/// Execute a directory operation with retries.
///
/// The operation is called up to `max_attempts` times. Retryable failures
/// wait with exponential backoff before the next attempt; non-retryable
/// failures are returned immediately.
///
/// # Arguments
///
/// * `config` - Retry configuration
/// * `f` - Operation to execute (must be `FnMut` and return a `Future`)
///
/// # Returns
///
/// The result of the operation, or the last error once attempts are
/// exhausted
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, mut f: F) -> DirectoryResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = DirectoryResult<T>>,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;

        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "Directory call succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if !e.is_retryable() => {
                return Err(e);
            }
            Err(e) if attempt >= config.max_attempts => {
                tracing::error!(
                    attempts = attempt,
                    error = %e,
                    "All retry attempts exhausted"
                );
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %e,
                    "Directory call failed, retrying"
                );

                sleep(delay).await;

                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * config.exponential_base)
                        .min(config.max_delay.as_secs_f64()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DirectoryError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryConfig::fast(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, DirectoryError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryConfig::fast(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(DirectoryError::Unavailable("flaky".into()))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: DirectoryResult<()> = with_retry(&RetryConfig::fast(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DirectoryError::Unavailable("down".into()))
        })
        .await;

        assert!(matches!(result, Err(DirectoryError::Unavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result: DirectoryResult<()> = with_retry(&RetryConfig::fast(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DirectoryError::MasterConflict)
        })
        .await;

        assert!(matches!(result, Err(DirectoryError::MasterConflict)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
