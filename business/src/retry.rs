//! Bounded retry with a pluggable delay and error classification.
//!
//! The default policy reproduces the dashboard's historic behaviour exactly: a fixed number of
//! attempts, the same delay between every pair of attempts, and every failure treated as
//! retryable. Callers may tighten it through [`RetryPolicy::with_delay_fn`] and
//! [`RetryPolicy::with_classifier`]; the policy never grows its delay on its own.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::api::FetchError;
use crate::config::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    Stop,
}

type DelayFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;
type ClassifyFn = Arc<dyn Fn(&FetchError) -> RetryDecision + Send + Sync>;

#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: DelayFn,
    classify: ClassifyFn,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("first_delay", &self.delay_for(1))
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// `max_attempts` tries with `delay` between consecutive ones. Zero is treated as one.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Arc::new(move |_attempt| delay),
            classify: Arc::new(|_err| RetryDecision::Retry),
        }
    }

    /// Replaces the delay function. It receives the 1-based number of the attempt that just
    /// failed.
    pub fn with_delay_fn(mut self, delay: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        self.delay = Arc::new(delay);
        self
    }

    /// Installs a hook deciding whether a failure is worth another attempt.
    pub fn with_classifier(
        mut self,
        classify: impl Fn(&FetchError) -> RetryDecision + Send + Sync + 'static,
    ) -> Self {
        self.classify = Arc::new(classify);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for(&self, failed_attempt: u32) -> Duration {
        (self.delay)(failed_attempt)
    }

    pub fn classify(&self, err: &FetchError) -> RetryDecision {
        (self.classify)(err)
    }

    /// Runs `attempt` until it succeeds, the budget runs out, or the classifier says stop.
    ///
    /// `attempt` receives the 1-based attempt number. Between attempts the task sleeps without
    /// blocking other tasks.
    pub async fn run<T, F, Fut>(&self, label: &str, mut attempt: F) -> Result<T, RetryExhausted>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut number = 1;
        loop {
            match attempt(number).await {
                Ok(value) => {
                    if number > 1 {
                        debug!("{label}: succeeded on attempt {number}/{}", self.max_attempts);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    warn!(
                        "{label}: attempt {number}/{} failed: {err}",
                        self.max_attempts
                    );

                    if number >= self.max_attempts || self.classify(&err) == RetryDecision::Stop {
                        return Err(RetryExhausted {
                            attempts: number,
                            last_error: err,
                        });
                    }

                    tokio::time::sleep(self.delay_for(number)).await;
                    number += 1;
                }
            }
        }
    }
}

/// The retry loop gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted {
    /// Attempts actually made.
    pub attempts: u32,
    pub last_error: FetchError,
}
