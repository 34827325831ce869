//! Page fetching with exponential backoff retry logic.
//!
//! [`RetryFetch`] wraps any [`PageFetcher`] and retries failed fetches with
//! exponential backoff and jitter. With `max_retries == 0` it is a plain
//! pass-through, which is the default.
//!
//! # Retry Strategy
//!
//! - `max_retries` attempts after the first failure
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use super::PageFetcher;
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Decorator adding retries with exponential backoff to a [`PageFetcher`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: PageFetcher,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt - 1).min(16) as u32;
        let mut delay = self.base_delay.saturating_mul(1 << shift);
        if delay > self.max_delay {
            delay = self.max_delay;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }

    async fn with_retries<'a, F, Fut>(&'a self, url: &'a str, op: F) -> Result<String, Box<dyn Error>>
    where
        F: Fn(&'a T, &'a str) -> Fut,
        Fut: Future<Output = Result<String, Box<dyn Error>>>,
    {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match op(&self.inner, url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_dt.as_millis(),
                                error = %e,
                                %url,
                                "fetch exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis(),
                        ?delay,
                        error = %e,
                        %url,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> PageFetcher for RetryFetch<T>
where
    T: PageFetcher,
{
    #[instrument(level = "debug", skip(self))]
    async fn fetch_index(&self, url: &str) -> Result<String, Box<dyn Error>> {
        self.with_retries(url, |inner, url| inner.fetch_index(url)).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_article(&self, url: &str) -> Result<String, Box<dyn Error>> {
        self.with_retries(url, |inner, url| inner.fetch_article(url)).await
    }
}
