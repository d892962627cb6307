//! Retry policy used solely by the Transport Bridge's `start()` connect
//! path (§4.4) — the only call site that retries inside the core.

use std::future::Future;
use std::time::Duration;

use wfk_kernel::error::KernelResult;

/// Delay strategy between retry attempts.
#[derive(Debug, Clone, Copy)]
pub enum RetryPolicy {
    /// Same delay every attempt.
    Fixed { delay_ms: u64 },
    /// Exponential backoff capped at `max_ms`, with optional jitter.
    ///
    /// Jitter alternates deterministically by +/-12.5% of the capped delay
    /// rather than drawing from an RNG, so retry timing stays reproducible
    /// in tests.
    ExponentialBackoff { base_ms: u64, max_ms: u64, jitter: bool },
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let ms = match self {
            RetryPolicy::Fixed { delay_ms } => *delay_ms,
            RetryPolicy::ExponentialBackoff { base_ms, max_ms, jitter } => {
                let exp = 1u64
                    .checked_shl(attempt as u32)
                    .and_then(|s| base_ms.checked_mul(s))
                    .unwrap_or(*max_ms);
                let capped = exp.min(*max_ms);
                if *jitter {
                    let eighth = capped / 8;
                    if attempt % 2 == 0 {
                        capped.saturating_add(eighth).min(*max_ms)
                    } else {
                        capped.saturating_sub(eighth)
                    }
                } else {
                    capped
                }
            }
        };
        Duration::from_millis(ms)
    }
}

/// How many attempts to make, the per-attempt timeout, and which
/// [`RetryPolicy`] to use between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub timeout_ms: u64,
    pub policy: RetryPolicy,
}

impl RetryConfig {
    /// Built directly from §4.4's defaults: 3 retries, 30s timeout.
    pub fn from_bridge_options(retries: u32, timeout_ms: u64) -> Self {
        Self {
            max_attempts: retries.max(1),
            timeout_ms,
            policy: RetryPolicy::ExponentialBackoff { base_ms: 200, max_ms: 5_000, jitter: true },
        }
    }
}

/// Retry `f` up to `config.max_attempts` times, applying `config.timeout_ms`
/// to each attempt. Stops at the first success; returns the last error if
/// every attempt fails.
pub async fn retry_with_timeout<F, Fut, T>(config: &RetryConfig, mut f: F) -> KernelResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = KernelResult<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts {
        if attempt > 0 {
            tokio::time::sleep(config.policy.delay_for(attempt as usize - 1)).await;
        }
        let attempt_result = tokio::time::timeout(Duration::from_millis(config.timeout_ms), f()).await;
        match attempt_result {
            Ok(Ok(v)) => return Ok(v),
            Ok(Err(e)) => last_err = Some(e),
            Err(_) => last_err = Some(wfk_kernel::error::KernelError::TimeoutExceeded(config.timeout_ms)),
        }
    }
    Err(last_err.unwrap_or_else(|| wfk_kernel::error::KernelError::Internal("no attempts made".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn fixed_delay_is_constant() {
        let p = RetryPolicy::Fixed { delay_ms: 250 };
        assert_eq!(p.delay_for(0), Duration::from_millis(250));
        assert_eq!(p.delay_for(9), Duration::from_millis(250));
    }

    #[test]
    fn exponential_delay_caps() {
        let p = RetryPolicy::ExponentialBackoff { base_ms: 100, max_ms: 500, jitter: false };
        assert_eq!(p.delay_for(0), Duration::from_millis(100));
        assert_eq!(p.delay_for(10), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let config = RetryConfig { max_attempts: 3, timeout_ms: 1_000, policy: RetryPolicy::Fixed { delay_ms: 0 } };

        let result: KernelResult<u32> = retry_with_timeout(&config, || {
            let c = c.clone();
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(wfk_kernel::error::KernelError::Internal("not yet".into()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_attempts_and_returns_last_error() {
        let config = RetryConfig { max_attempts: 2, timeout_ms: 1_000, policy: RetryPolicy::Fixed { delay_ms: 0 } };
        let result: KernelResult<u32> = retry_with_timeout(&config, || async {
            Err(wfk_kernel::error::KernelError::Internal("always fails".into()))
        })
        .await;
        assert!(result.is_err());
    }
}
