use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// TextModel Trait
// =============================================================================

/// A hosted model that turns one prompt into one completion.
///
/// Single-shot: no streaming, no conversation state kept between calls.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the underlying model, for logging.
    fn model_name(&self) -> &str;
}
