pub mod error;
pub mod types;

pub use error::{Result, TrendsError};
pub use types::{RelatedQueries, RelatedQuery};

use std::time::Duration;

use types::{ComparisonItem, ExploreRequest, ExploreResponse, RelatedSearchesResponse};

const BASE_URL: &str = "https://trends.google.com";

/// Query parameters fixed for every request a client makes.
#[derive(Debug, Clone)]
pub struct TrendsSettings {
    /// Interface language, e.g. `en-US`.
    pub hl: String,
    /// Timezone offset in minutes, as the trends UI sends it.
    pub tz: i32,
    /// Country code for the geography filter.
    pub geo: String,
    /// Time window, e.g. `today 1-m` for the trailing 30 days.
    pub timeframe: String,
    /// Content category; 0 means all categories.
    pub category: u32,
    /// Search property; empty string means web search.
    pub property: String,
}

impl Default for TrendsSettings {
    fn default() -> Self {
        Self {
            hl: "en-US".to_string(),
            tz: 330,
            geo: "IN".to_string(),
            timeframe: "today 1-m".to_string(),
            category: 0,
            property: String::new(),
        }
    }
}

pub struct TrendsClient {
    client: reqwest::Client,
    base_url: String,
    settings: TrendsSettings,
}

impl TrendsClient {
    pub fn new(settings: TrendsSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            settings,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch top and rising related queries for one keyword.
    ///
    /// A keyword with too little search volume has no related-queries widget;
    /// that comes back as an empty `RelatedQueries`, not an error.
    pub async fn related_queries(&self, keyword: &str) -> Result<RelatedQueries> {
        self.prime_cookies().await;

        let explore = self.explore(keyword).await?;
        let Some(widget) = explore.related_queries_widget() else {
            tracing::debug!(keyword, "No related-queries widget for keyword");
            return Ok(RelatedQueries::default());
        };

        let req = serde_json::to_string(&widget.request)?;
        let tz = self.settings.tz.to_string();
        let url = format!("{}/trends/api/widgetdata/relatedsearches", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("hl", self.settings.hl.as_str()),
                ("tz", tz.as_str()),
                ("req", req.as_str()),
                ("token", widget.token.as_str()),
            ])
            .send()
            .await?;

        let body = checked_body(resp).await?;
        let parsed: RelatedSearchesResponse = serde_json::from_str(strip_json_prefix(&body)?)?;
        let related = parsed.into_related();

        tracing::debug!(
            keyword,
            top = related.top.len(),
            rising = related.rising.len(),
            "Fetched related queries"
        );

        Ok(related)
    }

    /// Resolve widget tokens for a keyword.
    async fn explore(&self, keyword: &str) -> Result<ExploreResponse> {
        let payload = ExploreRequest {
            comparison_item: vec![ComparisonItem {
                keyword,
                time: &self.settings.timeframe,
                geo: &self.settings.geo,
            }],
            category: self.settings.category,
            property: &self.settings.property,
        };
        let req = serde_json::to_string(&payload)?;
        let tz = self.settings.tz.to_string();

        let url = format!("{}/trends/api/explore", self.base_url);
        let resp = self
            .client
            .post(&url)
            .query(&[
                ("hl", self.settings.hl.as_str()),
                ("tz", tz.as_str()),
                ("req", req.as_str()),
            ])
            .send()
            .await?;

        let body = checked_body(resp).await?;
        Ok(serde_json::from_str(strip_json_prefix(&body)?)?)
    }

    /// The API rejects requests without the session cookie the landing page sets.
    async fn prime_cookies(&self) {
        let url = format!("{}/?geo={}", self.base_url, self.settings.geo);
        if let Err(e) = self.client.get(&url).send().await {
            tracing::warn!(error = %e, "Failed to prime trends session cookie");
        }
    }
}

async fn checked_body(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    if status.as_u16() == 429 {
        return Err(TrendsError::RateLimited);
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(TrendsError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.text().await?)
}

/// Trends responses open with an anti-hijacking guard such as `)]}',`.
pub(crate) fn strip_json_prefix(body: &str) -> Result<&str> {
    body.find('{')
        .map(|i| &body[i..])
        .ok_or_else(|| TrendsError::Parse("response contains no JSON object".to_string()))
}
