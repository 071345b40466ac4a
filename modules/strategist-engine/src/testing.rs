// Test mocks for the strategist pipelines.
//
// One mock per trait seam, plus variants for failure paths:
// - MockTrendSource (TrendSource): HashMap-based topic→RelatedQueries
// - MockPageFetcher (PageFetcher): HashMap-based URL→HTML, counts fetches
// - EchoModel / RecordingModel / FailingModel (TextModel)
//
// Plus `strategist_with` for assembling a Strategist from mocks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use trends_client::{RelatedQueries, RelatedQuery};

use crate::cache::ScrapeCache;
use crate::pipeline::Strategist;
use crate::traits::{PageFetcher, TextModel, TrendSource};

// ---------------------------------------------------------------------------
// MockTrendSource
// ---------------------------------------------------------------------------

/// Unregistered topics return empty lists (the no-data case).
/// Topics registered with `.on_failure()` return `Err`.
pub struct MockTrendSource {
    topics: HashMap<String, RelatedQueries>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockTrendSource {
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            failures: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn on_topic(mut self, topic: &str, top: &[(&str, u32)]) -> Self {
        self.topics.insert(
            topic.to_string(),
            RelatedQueries {
                top: rows(top),
                rising: Vec::new(),
            },
        );
        self
    }

    pub fn on_topic_with_rising(
        mut self,
        topic: &str,
        top: &[(&str, u32)],
        rising: &[(&str, u32)],
    ) -> Self {
        self.topics.insert(
            topic.to_string(),
            RelatedQueries {
                top: rows(top),
                rising: rows(rising),
            },
        );
        self
    }

    pub fn on_failure(mut self, topic: &str, message: &str) -> Self {
        self.failures.insert(topic.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTrendSource {
    fn default() -> Self {
        Self::new()
    }
}

fn rows(items: &[(&str, u32)]) -> Vec<RelatedQuery> {
    items
        .iter()
        .map(|(q, v)| RelatedQuery {
            query: q.to_string(),
            value: *v,
        })
        .collect()
}

#[async_trait]
impl TrendSource for MockTrendSource {
    async fn related_queries(&self, topic: &str) -> Result<RelatedQueries> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failures.get(topic) {
            return Err(anyhow!("{message}"));
        }
        Ok(self.topics.get(topic).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MockPageFetcher
// ---------------------------------------------------------------------------

/// Returns `Err` for unregistered URLs, like an unreachable host.
pub struct MockPageFetcher {
    pages: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn on_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("MockPageFetcher: could not connect to {url}"))
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// Returns the prompt it was given.
pub struct EchoModel;

#[async_trait]
impl TextModel for EchoModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

/// Records every prompt and answers with a fixed response.
pub struct RecordingModel {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingModel {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock poisoned").clone()
    }
}

#[async_trait]
impl TextModel for RecordingModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(prompt.to_string());
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

/// Always fails, like a rejected API key.
pub struct FailingModel {
    message: String,
    calls: AtomicUsize,
}

impl FailingModel {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for FailingModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("{}", self.message))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Assemble a Strategist from mocks with a small default cache.
pub fn strategist_with(
    trends: Arc<dyn TrendSource>,
    pages: Arc<dyn PageFetcher>,
    model: Arc<dyn TextModel>,
) -> Strategist {
    Strategist::new(
        trends,
        pages,
        model,
        ScrapeCache::new(16, Duration::from_secs(300)),
    )
}
