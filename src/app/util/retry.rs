use std::{
    fmt::Display,
    future::Future,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use tokio_retry::{strategy::FixedInterval, RetryIf};

use crate::app::errors::AppError;

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for AppError {
    fn is_retryable(&self) -> bool {
        AppError::is_retryable(self)
    }
}

/// Fixed-delay retry applied to every network-calling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `action` until it succeeds, returns a non-retryable error, or
    /// `max_attempts` attempts have been made.
    pub async fn run<T, E, A, Fut>(&self, operation: &str, action: A) -> Result<T, E>
    where
        E: Retryable + Display,
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_if(operation, action, |e: &E| e.is_retryable())
            .await
    }

    /// Like `run`, but only errors accepted by `retryable` are retried.
    pub async fn run_if<T, E, A, Fut, C>(
        &self,
        operation: &str,
        mut action: A,
        mut retryable: C,
    ) -> Result<T, E>
    where
        E: Display,
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: FnMut(&E) -> bool,
    {
        let retries = self.max_attempts.saturating_sub(1) as usize;
        let strategy = FixedInterval::new(self.delay).take(retries);
        let attempt = AtomicU32::new(0);

        RetryIf::start(
            strategy,
            || {
                attempt.fetch_add(1, Ordering::Relaxed);
                action()
            },
            |e: &E| {
                let retry = retryable(e);
                let attempt = attempt.load(Ordering::Relaxed);

                if retry && attempt < self.max_attempts {
                    tracing::warn!(
                        "{} failed on attempt {}/{}: {}",
                        operation,
                        attempt,
                        self.max_attempts,
                        e
                    );
                }

                retry
            },
        )
        .await
    }
}
