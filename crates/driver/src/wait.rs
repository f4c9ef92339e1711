//! Polling wait engine
//!
//! The single synchronization primitive: every higher-level wait in the
//! harness is [`wait_until`] parameterized with a different probe.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::trace;

use crate::error::{Error, Result};

/// Default wait budget (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling cadence (1 second)
pub const DEFAULT_INTERVAL_MS: u64 = 1_000;

/// Budget and cadence for a single wait operation.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Total budget before the wait fails with a timeout.
    pub timeout: Duration,
    /// Pause between consecutive probes.
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout = Duration::from_millis(ms);
        self
    }

    #[must_use]
    pub const fn with_interval_ms(mut self, ms: u64) -> Self {
        self.interval = Duration::from_millis(ms);
        self
    }
}

/// Repeatedly evaluate `probe` until it yields true or the budget elapses.
///
/// The probe runs once immediately, then every `opts.interval`. A probe
/// whose start time would fall at or past the deadline is not attempted;
/// the wait fails there with [`Error::Timeout`] carrying `label` and the
/// elapsed time. Probes must be safe to call repeatedly (observation
/// only); a probe error aborts the wait and propagates unmodified.
///
/// Resolves with the elapsed time of the successful probe.
pub async fn wait_until<F, Fut>(label: &str, opts: &WaitOptions, mut probe: F) -> Result<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    loop {
        if probe().await? {
            let elapsed = start.elapsed();
            trace!(target: "datascope_driver::wait", %label, ?elapsed, "condition met");
            return Ok(elapsed);
        }

        sleep(opts.interval).await;

        if start.elapsed() >= opts.timeout {
            return Err(Error::Timeout {
                waited_for: label.to_string(),
                elapsed_ms: start.elapsed().as_millis() as u64,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fast() -> WaitOptions {
        WaitOptions::new().with_timeout_ms(200).with_interval_ms(10)
    }

    #[test]
    fn defaults_match_documented_values() {
        let opts = WaitOptions::default();
        assert_eq!(opts.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(opts.interval, Duration::from_millis(DEFAULT_INTERVAL_MS));

        let opts = WaitOptions::new().with_timeout_ms(5000).with_interval_ms(50);
        assert_eq!(opts.timeout, Duration::from_millis(5000));
        assert_eq!(opts.interval, Duration::from_millis(50));
    }

    #[tokio::test]
    async fn resolves_immediately_when_already_true() {
        let elapsed = wait_until("noop", &fast(), || async { Ok(true) })
            .await
            .unwrap();
        assert!(elapsed < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn resolves_once_condition_flips() {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = flag.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(40)).await;
            setter.store(true, Ordering::SeqCst);
        });

        let flag = &flag;
        let elapsed = wait_until("flag", &fast(), || async move {
            Ok(flag.load(Ordering::SeqCst))
        })
        .await
        .unwrap();
        assert!(elapsed >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn times_out_when_never_true() {
        let err = wait_until("never", &fast(), || async { Ok(false) })
            .await
            .unwrap_err();
        match err {
            Error::Timeout {
                waited_for,
                elapsed_ms,
            } => {
                assert_eq!(waited_for, "never");
                assert!(elapsed_ms >= 200);
            }
            other => panic!("expected Timeout, got {other}"),
        }
    }

    #[tokio::test]
    async fn probe_error_propagates_without_retry() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = &attempts;
        let err = wait_until("broken probe", &fast(), || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Error::Protocol("connection lost".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
