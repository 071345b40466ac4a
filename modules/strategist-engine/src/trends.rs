use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use strategist_common::{StrategistError, TrendQuery};
use trends_client::RelatedQuery;

use crate::traits::TrendSource;

/// Fetches the "top" related queries for a topic.
///
/// `Ok(vec![])` is the no-data outcome. Transport problems are
/// `StrategistError::Transport`, never an empty result.
pub struct TrendFetcher {
    source: Arc<dyn TrendSource>,
}

impl TrendFetcher {
    pub fn new(source: Arc<dyn TrendSource>) -> Self {
        Self { source }
    }

    pub async fn fetch_trends(&self, topic: &str) -> Result<Vec<TrendQuery>, StrategistError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(StrategistError::Validation(
                "Please enter a content topic.".to_string(),
            ));
        }

        let started = Instant::now();
        let related = self.source.related_queries(topic).await.map_err(|e| {
            warn!(topic, error = %e, "Trends fetch failed");
            StrategistError::Transport(format!("{e:#}"))
        })?;

        // Rising queries are parsed by the client but not surfaced.
        let trends = top_queries(related.top);

        info!(
            topic,
            rows = trends.len(),
            rising_discarded = related.rising.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched trends"
        );

        Ok(trends)
    }
}

/// Keep upstream order; drop rows with no query text.
fn top_queries(rows: Vec<RelatedQuery>) -> Vec<TrendQuery> {
    rows.into_iter()
        .filter(|r| !r.query.trim().is_empty())
        .map(|r| TrendQuery::new(r.query, r.value))
        .collect()
}
