// Trait seams for the three external capabilities.
//
// TrendSource: related search queries for a topic (Google Trends in production).
// PageFetcher: raw markup for a URL (reqwest GET in production).
// TextModel: re-exported from ai-client; one prompt in, one completion out.
//
// The engine holds these as `Arc<dyn _>`; mocks live in `testing`.

use anyhow::Result;
use async_trait::async_trait;

pub use ai_client::TextModel;
use trends_client::{RelatedQueries, TrendsClient};

// ---------------------------------------------------------------------------
// TrendSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Related queries for one topic. A topic with no data is `Ok` with
    /// empty lists; `Err` means the service could not be reached or refused.
    async fn related_queries(&self, topic: &str) -> Result<RelatedQueries>;
}

#[async_trait]
impl TrendSource for TrendsClient {
    async fn related_queries(&self, topic: &str) -> Result<RelatedQueries> {
        Ok(TrendsClient::related_queries(self, topic).await?)
    }
}

// ---------------------------------------------------------------------------
// PageFetcher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its body. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}
