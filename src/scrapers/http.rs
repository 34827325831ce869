//! HTTP page fetcher.
//!
//! Fetches category and article pages with browser-like request headers. The
//! user agent is picked at random per request, and every article fetch is
//! preceded by a random pause within the configured delay range to keep the
//! request rate polite.

use super::PageFetcher;
use crate::config::ScraperConfig;
use rand::{Rng, rng};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
];

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    delay_range: (f64, f64),
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            delay_range: config.delay_range,
        })
    }

    /// Pause for a uniformly random duration within the delay range.
    async fn random_delay(&self) {
        let (min, max) = self.delay_range;
        let secs = if max > min {
            rng().random_range(min..=max)
        } else {
            min
        };
        if secs > 0.0 {
            debug!(secs, "Delaying before article fetch");
            sleep(Duration::from_secs_f64(secs)).await;
        }
    }

    async fn get(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self
            .client
            .get(url)
            .headers(random_headers())
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        info!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch_index(&self, url: &str) -> Result<String, Box<dyn Error>> {
        self.get(url).await
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_article(&self, url: &str) -> Result<String, Box<dyn Error>> {
        self.random_delay().await;
        self.get(url).await
    }
}

/// Browser-like headers with a randomly chosen user agent.
pub fn random_headers() -> HeaderMap {
    let agent = USER_AGENTS[rng().random_range(0..USER_AGENTS.len())];
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_headers() {
        let headers = random_headers();
        let agent = headers.get(USER_AGENT).unwrap().to_str().unwrap();
        assert!(USER_AGENTS.contains(&agent));
        assert_eq!(headers.get("dnt").unwrap(), "1");
        assert_eq!(headers.get(ACCEPT_LANGUAGE).unwrap(), "en-US,en;q=0.5");
    }

    #[test]
    fn test_new_from_config() {
        let fetcher = HttpFetcher::new(&ScraperConfig::default()).unwrap();
        assert_eq!(fetcher.delay_range, (1.0, 3.0));
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let mut config = ScraperConfig::default();
        config.delay_range = (0.0, 0.0);
        let fetcher = HttpFetcher::new(&config).unwrap();
        let t0 = std::time::Instant::now();
        fetcher.random_delay().await;
        assert!(t0.elapsed() < Duration::from_millis(100));
    }
}
