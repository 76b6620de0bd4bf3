//! The poll loop.

use std::future::Future;
use std::time::Duration;

use browserd_config::WaitConfig;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{BrowserError, ErrorKind};
use crate::session::SessionManager;

use super::condition::WaitCondition;

/// Result of a bounded wait. Timing out is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied,
    TimedOut,
}

/// Polls conditions at a fixed interval under a server-enforced ceiling.
#[derive(Debug, Clone)]
pub struct WaitEngine {
    poll_interval: Duration,
    max_timeout: Duration,
}

impl WaitEngine {
    pub fn new(config: &WaitConfig) -> Self {
        Self::with_interval(config.poll_interval(), config.max_timeout())
    }

    pub fn with_interval(poll_interval: Duration, max_timeout: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            max_timeout,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Clamp a caller supplied timeout to the ceiling.
    pub fn clamp(&self, timeout: Duration) -> Duration {
        timeout.min(self.max_timeout)
    }

    /// Clamp a timeout given in (possibly fractional or negative) seconds.
    pub fn clamp_secs(&self, seconds: f64) -> Duration {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        if seconds >= self.max_timeout.as_secs_f64() {
            return self.max_timeout;
        }
        Duration::from_secs_f64(seconds)
    }

    /// Unconditional delay, clamped. Returns the time actually slept.
    pub async fn sleep(&self, duration: Duration) -> Duration {
        let duration = self.clamp(duration);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
        duration
    }

    /// Run `probe` until it reports true or `timeout` elapses.
    ///
    /// The probe is always evaluated at least once, and once more at the
    /// deadline. `StaleContext` from a probe means the page is mid-navigation
    /// and counts as not yet satisfied. The whole loop is bounded by
    /// `timeout + poll_interval` even if a probe stalls.
    pub async fn poll_until<F, Fut>(&self, timeout: Duration, mut probe: F) -> Result<WaitOutcome, BrowserError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, BrowserError>>,
    {
        let timeout = self.clamp(timeout);
        let deadline = Instant::now() + timeout;
        let interval = self.poll_interval;

        let run = async {
            loop {
                match probe().await {
                    Ok(true) => return Ok(WaitOutcome::Satisfied),
                    Ok(false) => {}
                    Err(e) if e.kind() == ErrorKind::StaleContext => {
                        debug!("Wait probe hit a stale context, retrying: {}", e);
                    }
                    Err(e) => return Err(e),
                }

                let now = Instant::now();
                if now >= deadline {
                    return Ok(WaitOutcome::TimedOut);
                }
                tokio::time::sleep((deadline - now).min(interval)).await;
            }
        };

        match tokio::time::timeout(timeout + interval, run).await {
            Ok(outcome) => outcome,
            Err(_) => Ok(WaitOutcome::TimedOut),
        }
    }

    /// Wait for a condition on the active page. The session lock is held
    /// only for each individual check.
    pub async fn wait(
        &self,
        manager: &SessionManager,
        condition: &WaitCondition,
        timeout: Duration,
    ) -> Result<WaitOutcome, BrowserError> {
        debug!("Waiting up to {:?} for {}", self.clamp(timeout), condition.describe());
        let outcome = self
            .poll_until(timeout, move || async move {
                let mut session = manager.acquire().await?;
                condition.check(&mut session).await
            })
            .await?;
        debug!("Wait for {} finished: {:?}", condition.describe(), outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
