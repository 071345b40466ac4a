use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use strategist_common::StrategistError;

use crate::cache::ScrapeCache;
use crate::traits::PageFetcher;

/// Desktop Chrome User-Agent sent with every scrape request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// --- HTTP fetcher ---

/// Single-GET page fetcher with a browser User-Agent and a hard timeout.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!("request timed out")
            } else {
                anyhow::Error::new(e)
            }
        })?;

        let status = resp.status();
        if !(status.is_success() || status.is_redirection()) {
            bail!("HTTP {status}");
        }

        Ok(resp.text().await?)
    }
}

// --- Heading extraction ---

/// Text of every `h1`/`h2`, whitespace-collapsed, deduplicated.
///
/// Returns `None` when the markup has no `h1`/`h2` elements at all, and
/// `Some(vec![])` when it has some but they are all blank.
pub fn extract_headlines(html: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("h1, h2").ok()?;

    let mut found_any = false;
    let mut headlines = BTreeSet::new();
    for el in document.select(&selector) {
        found_any = true;
        let text = el.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !text.is_empty() {
            headlines.insert(text);
        }
    }

    found_any.then(|| headlines.into_iter().collect())
}

// --- Competitor scraper ---

pub struct CompetitorScraper {
    fetcher: Arc<dyn PageFetcher>,
    cache: ScrapeCache,
}

impl CompetitorScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, cache: ScrapeCache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &ScrapeCache {
        &self.cache
    }

    /// Headlines from a competitor page, served from cache when fresh.
    pub async fn scrape_headlines(&self, url: &str) -> Result<Vec<String>, StrategistError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StrategistError::Validation(
                "Please enter a competitor URL.".to_string(),
            ));
        }

        if let Some(cached) = self.cache.get(url) {
            debug!(url, count = cached.len(), "Scrape cache hit");
            return Ok(cached);
        }

        let html = self.fetcher.fetch(url).await.map_err(|e| {
            warn!(url, error = %e, "Competitor fetch failed");
            StrategistError::ScrapeFailed(format!("{e:#}"))
        })?;

        let Some(headlines) = extract_headlines(&html) else {
            info!(url, bytes = html.len(), "No heading elements on competitor page");
            return Err(StrategistError::EmptyScrapeResult {
                url: url.to_string(),
            });
        };

        info!(url, count = headlines.len(), "Scraped competitor headlines");
        self.cache.insert(url, headlines.clone());
        Ok(headlines)
    }
}
