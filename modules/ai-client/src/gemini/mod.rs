mod client;
pub(crate) mod types;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::traits::TextModel;
use client::GeminiClient;
use types::*;

// =============================================================================
// Gemini Model
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    max_output_tokens: Option<u32>,
    base_url: Option<String>,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_output_tokens: None,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(&self.api_key);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Send one prompt, return the first candidate's text verbatim.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let mut request = GenerateRequest::prompt(prompt);
        if let Some(max) = self.max_output_tokens {
            request = request.max_output_tokens(max);
        }

        let response = self.client().generate_content(&self.model, &request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini usage"
            );
        }

        match response.text() {
            Some(text) => Ok(text),
            None => match response.block_reason() {
                Some(reason) => Err(anyhow!("Gemini blocked the prompt: {reason}")),
                None => Err(anyhow!(
                    "No text in Gemini response (finish reason: {})",
                    response.finish_reason().unwrap_or("unknown")
                )),
            },
        }
    }
}

// =============================================================================
// TextModel Implementation
// =============================================================================

#[async_trait]
impl TextModel for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
