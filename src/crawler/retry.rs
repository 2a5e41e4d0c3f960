//! Bounded retry with a fixed delay between attempts

use crate::config::RetryConfig;
use crate::render::RenderError;
use std::future::Future;
use std::time::Duration;

/// Retries a fallible renderer operation a bounded number of times
///
/// | Setting      | Meaning                                  |
/// |--------------|------------------------------------------|
/// | max_attempts | total tries, including the first         |
/// | delay        | pause after each failed try but the last |
///
/// The delay is a plain `tokio::time::sleep`, so an enclosing deadline
/// cancels it like any other await point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Policy for acquiring renderer sessions
    pub fn for_launch(config: &RetryConfig) -> Self {
        Self::new(
            config.launch_attempts,
            Duration::from_millis(config.launch_delay_ms),
        )
    }

    /// Policy for loading pages
    pub fn for_load(config: &RetryConfig) -> Self {
        Self::new(
            config.load_attempts,
            Duration::from_millis(config.load_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `op` until it succeeds or the attempts are used up
    ///
    /// The error of the final attempt is returned unchanged.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, RenderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RenderError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    tracing::warn!(
                        "{} attempt {}/{} failed: {}",
                        operation,
                        attempt,
                        self.max_attempts,
                        e
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::debug!(
                        "{} failed after {} attempt(s): {}",
                        operation,
                        attempt,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }
}
