//! The two user-triggered pipelines.
//!
//! Plan:       Trend Fetcher -> Strategy Generator (plan template)
//! Competitor: Competitor Scraper -> Strategy Generator (gap-analysis template)
//!
//! Each run is all-or-nothing and ends in an outcome value; nothing here
//! returns `Err`, so callers render every branch.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use strategist_common::{Config, PlanRequest, StrategistError, TrendQuery};
use trends_client::{TrendsClient, TrendsSettings};

use crate::cache::ScrapeCache;
use crate::competitor::{CompetitorScraper, HttpPageFetcher};
use crate::strategy::StrategyGenerator;
use crate::traits::{PageFetcher, TextModel, TrendSource};
use crate::trends::TrendFetcher;

// --- Outcomes ---

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub topic: String,
    pub trends: Vec<TrendQuery>,
    pub strategy: String,
}

#[derive(Debug)]
pub enum PlanOutcome {
    Ready(PlanReport),
    NoData { topic: String },
    Failed(StrategistError),
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitorReport {
    pub url: String,
    pub headlines: Vec<String>,
    pub analysis: String,
}

#[derive(Debug)]
pub enum CompetitorOutcome {
    Ready(CompetitorReport),
    NoHeadlines { url: String },
    Failed(StrategistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A user-facing warning or error line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl PlanOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            PlanOutcome::Ready(_) => None,
            PlanOutcome::NoData { topic } => Some(Notice {
                level: NoticeLevel::Warning,
                message: StrategistError::NoDataFound {
                    topic: topic.clone(),
                }
                .user_message(),
            }),
            PlanOutcome::Failed(e) => Some(Notice {
                level: NoticeLevel::Error,
                message: e.user_message(),
            }),
        }
    }
}

impl CompetitorOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            CompetitorOutcome::Ready(_) => None,
            CompetitorOutcome::NoHeadlines { url } => Some(Notice {
                level: NoticeLevel::Warning,
                message: StrategistError::EmptyScrapeResult { url: url.clone() }.user_message(),
            }),
            CompetitorOutcome::Failed(e) => Some(Notice {
                level: NoticeLevel::Error,
                message: e.user_message(),
            }),
        }
    }
}

// --- Strategist ---

/// Owns the three components; built once by the entry point and shared.
pub struct Strategist {
    trends: TrendFetcher,
    scraper: CompetitorScraper,
    generator: StrategyGenerator,
}

impl Strategist {
    pub fn new(
        trends: Arc<dyn TrendSource>,
        pages: Arc<dyn PageFetcher>,
        model: Arc<dyn TextModel>,
        cache: ScrapeCache,
    ) -> Self {
        Self {
            trends: TrendFetcher::new(trends),
            scraper: CompetitorScraper::new(pages, cache),
            generator: StrategyGenerator::new(model),
        }
    }

    /// Wire the production clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, StrategistError> {
        let settings = TrendsSettings {
            hl: config.trends_hl.clone(),
            tz: config.trends_tz,
            geo: config.trends_geo.clone(),
            timeframe: config.trends_timeframe.clone(),
            ..TrendsSettings::default()
        };
        let trends = TrendsClient::new(settings)
            .map_err(|e| StrategistError::Config(format!("trends client: {e}")))?;

        let pages = HttpPageFetcher::new(Duration::from_secs(config.scrape_timeout_secs))
            .map_err(|e| StrategistError::Config(format!("scrape client: {e:#}")))?;

        let mut model = ai_client::Gemini::new(&config.gemini_api_key, &config.gemini_model);
        if let Some(ref url) = config.gemini_base_url {
            model = model.with_base_url(url);
        }
        if let Some(max) = config.gemini_max_output_tokens {
            model = model.with_max_output_tokens(max);
        }

        let cache = ScrapeCache::new(
            config.scrape_cache_capacity,
            Duration::from_secs(config.scrape_cache_ttl_secs),
        );

        Ok(Self::new(
            Arc::new(trends),
            Arc::new(pages),
            Arc::new(model),
            cache,
        ))
    }

    pub fn scraper(&self) -> &CompetitorScraper {
        &self.scraper
    }

    /// Trends for the topic, then a content plan. No data short-circuits
    /// before the model is called.
    pub async fn run_plan(&self, request: PlanRequest) -> PlanOutcome {
        let topic = request.topic.trim().to_string();
        info!(topic = topic.as_str(), "Plan pipeline started");

        let trends = match self.trends.fetch_trends(&topic).await {
            Ok(trends) => trends,
            Err(e) => return PlanOutcome::Failed(e),
        };
        if trends.is_empty() {
            info!(topic = topic.as_str(), "No trend data, skipping generation");
            return PlanOutcome::NoData { topic };
        }

        let input = PlanRequest { topic, ..request }.into_input(trends);
        match self.generator.generate_plan(&input).await {
            Ok(strategy) => PlanOutcome::Ready(PlanReport {
                topic: input.topic,
                trends: input.trends,
                strategy,
            }),
            Err(e) => PlanOutcome::Failed(e),
        }
    }

    /// Competitor headlines, then a gap analysis. A page without headings
    /// short-circuits before the model is called.
    pub async fn run_competitor(&self, url: &str) -> CompetitorOutcome {
        let url = url.trim().to_string();
        info!(url = url.as_str(), "Competitor pipeline started");

        let headlines = match self.scraper.scrape_headlines(&url).await {
            Ok(headlines) if headlines.is_empty() => {
                return CompetitorOutcome::NoHeadlines { url };
            }
            Ok(headlines) => headlines,
            Err(StrategistError::EmptyScrapeResult { .. }) => {
                return CompetitorOutcome::NoHeadlines { url };
            }
            Err(e) => return CompetitorOutcome::Failed(e),
        };

        match self.generator.generate_competitor_analysis(&headlines).await {
            Ok(analysis) => CompetitorOutcome::Ready(CompetitorReport {
                url,
                headlines,
                analysis,
            }),
            Err(e) => CompetitorOutcome::Failed(e),
        }
    }
}
