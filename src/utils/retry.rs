//! Fixed-backoff retry for transient transport failures.

use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts (first try included)
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Execute an async operation, retrying transient failures with a fixed
/// backoff.
///
/// `is_transient` classifies errors: only errors it accepts are retried,
/// everything else returns immediately. After `max_attempts` the last
/// error is returned to the caller.
pub async fn with_retry<T, E, F, Fut, P>(
    config: RetryConfig,
    mut operation: F,
    is_transient: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    tracing::info!(
                        "Operation succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Err(error) if is_transient(&error) && attempts < config.max_attempts => {
                tracing::debug!(
                    "Transient error on attempt {}: {}, retrying in {:?}",
                    attempts,
                    error,
                    config.backoff
                );
                sleep(config.backoff).await;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Whether a reqwest error is worth retrying: connection-level failures
/// and timeouts only. HTTP statuses are handled by the fetch layer.
pub(crate) fn transient_transport(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            backoff: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, String> = {
            let call_count = call_count.clone();
            with_retry(
                fast_config(3),
                move || {
                    let call_count = call_count.clone();
                    async move {
                        *call_count.borrow_mut() += 1;
                        Ok("success")
                    }
                },
                |_| true,
            )
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_transient_failures() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, String> = {
            let call_count = call_count.clone();
            with_retry(
                fast_config(3),
                move || {
                    let call_count = call_count.clone();
                    async move {
                        *call_count.borrow_mut() += 1;
                        let count = *call_count.borrow();
                        if count < 3 {
                            Err("connection refused".to_string())
                        } else {
                            Ok("success")
                        }
                    }
                },
                |_| true,
            )
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts_attempts() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, String> = {
            let call_count = call_count.clone();
            with_retry(
                fast_config(3),
                move || {
                    let call_count = call_count.clone();
                    async move {
                        *call_count.borrow_mut() += 1;
                        Err("connection reset".to_string())
                    }
                },
                |_| true,
            )
        }
        .await;

        assert_eq!(result.unwrap_err(), "connection reset");
        assert_eq!(*call_count.borrow(), 3);
    }

    #[tokio::test]
    async fn test_no_retry_on_permanent_error() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, String> = {
            let call_count = call_count.clone();
            with_retry(
                fast_config(5),
                move || {
                    let call_count = call_count.clone();
                    async move {
                        *call_count.borrow_mut() += 1;
                        Err("not found".to_string())
                    }
                },
                |err| err.contains("connection"),
            )
        }
        .await;

        assert_eq!(result.unwrap_err(), "not found");
        assert_eq!(*call_count.borrow(), 1);
    }
}
