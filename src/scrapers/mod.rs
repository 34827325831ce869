//! Fetch layer: page retrieval and article link discovery.
//!
//! Collection follows a two-phase pattern per category:
//!
//! 1. **Indexing**: Fetch the category listing page and discover article URLs
//! 2. **Fetching**: Download each article page for field extraction
//!
//! # Submodules
//!
//! - [`http`]: [`PageFetcher`] over `reqwest` with randomized headers and delays
//! - [`retry`]: Exponential-backoff decorator for any [`PageFetcher`]

pub mod http;
pub mod retry;

use crate::config::{Category, ScraperConfig};
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Retrieves raw page HTML.
///
/// Implementations own all network concerns: headers, pacing, and retries.
pub trait PageFetcher {
    /// Fetch a category listing page.
    async fn fetch_index(&self, url: &str) -> Result<String, Box<dyn Error>>;

    /// Fetch an article page.
    async fn fetch_article(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Selectors for article links on a category page, in priority order.
const LINK_SELECTORS: &[&str] = &[
    r#"a[href*="/news/"]"#,
    r#"a[href*="/article/"]"#,
    ".news-item a",
    ".article-link",
    "h2 a, h3 a, h4 a",
];

const INVALID_URL_PATTERNS: &[&str] = &[
    "javascript:",
    "mailto:",
    "tel:",
    "#",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "youtube.com",
    "whatsapp.com",
];

/// Reject non-navigational and social-media links.
pub fn is_valid_article_url(url: &str) -> bool {
    let url = url.to_lowercase();
    !INVALID_URL_PATTERNS.iter().any(|pattern| url.contains(pattern))
}

/// Article URLs found on a category page, absolute and in first-seen order.
pub fn extract_article_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links: Vec<String> = Vec::new();

    for css in LINK_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if !is_valid_article_url(href) {
                continue;
            }
            if let Ok(resolved) = base.join(href) {
                let resolved = resolved.to_string();
                if !links.contains(&resolved) {
                    links.push(resolved);
                }
            }
        }
    }

    debug!(urls = ?links, "Discovered article links");
    links
}

/// Discover up to `cap` article URLs for one category.
///
/// # Arguments
///
/// * `fetcher` - Used to download the category listing
/// * `config` - Supplies the base URL that category paths are joined onto
/// * `category` - The category to index
/// * `cap` - Maximum number of links returned
///
/// # Returns
///
/// Absolute, deduplicated article URLs in page order. An empty listing is not
/// an error. Fetch and URL errors are returned so the caller can skip the
/// category.
///
/// # Examples
///
/// ```ignore
/// let links = index_category(&fetcher, &config, &config.categories[0], 11).await?;
/// assert!(links.len() <= 11);
/// ```
#[instrument(level = "info", skip(fetcher, config), fields(category = %category.key))]
pub async fn index_category<F: PageFetcher>(
    fetcher: &F,
    config: &ScraperConfig,
    category: &Category,
    cap: usize,
) -> Result<Vec<String>, Box<dyn Error>> {
    let base = Url::parse(&config.base_url)?;
    let page_url = base.join(&category.path)?;

    let html = fetcher.fetch_index(page_url.as_str()).await?;
    let mut links = extract_article_links(&html, &base);

    info!(
        found = links.len(),
        cap,
        source = %page_url,
        "Indexed category article links"
    );
    if links.is_empty() {
        warn!(source = %page_url, "No article links found");
    }

    links.truncate(cap);
    Ok(links)
}
