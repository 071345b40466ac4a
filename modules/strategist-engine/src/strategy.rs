use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use ai_client::util::preview;
use strategist_common::{format_trend_table, StrategistError, StrategyInput};

use crate::traits::TextModel;

// --- Prompt templates ---

const PLAN_ROLE: &str =
    "You are a world-class Content Strategist and Prompt Engineer for a digital marketing agency.";

const PLAN_TASK: &str = "\
**Analysis Task (Chain of Thought):**
1.  **Analyze the Input:** Review the client's topic ('{topic}') and the provided list of trending queries.
2.  **Identify Core Themes:** What are the underlying themes or user intents behind these trending searches? (e.g., are people looking for 'how-to guides', 'cost comparisons', 'product reviews', 'beginner tips'?).
3.  **Brainstorm Content Angles:** Based on these themes, brainstorm 3 distinct and creative content ideas that would perform well on platforms like YouTube, blogs, and social media.
4.  **Structure the Strategy:** Format these ideas into a clear, actionable 3-day content plan.";

const PLAN_OUTPUT: &str = "\
**Final Output Requirement:**
Generate a concise, 3-day content strategy plan. For each day, provide:
- A \"killer\" headline/title that is SEO-friendly and attention-grabbing.
- The best content format (e.g., Blog Post, YouTube Video, Instagram Reel).
- A short summary (2-3 sentences) of what the content will cover, including the angle.

Do not include any extra conversational text or introductions like \"Here is the content strategy\".";

const COMPETITOR_ROLE: &str =
    "You are a world-class Content Strategist performing a competitive content gap analysis for a digital marketing agency.";

const COMPETITOR_TASK: &str = "\
**Analysis Task (Chain of Thought):**
1.  **Analyze the Headlines:** Review every headline the competitor has published.
2.  **Identify Content Pillars:** Group the headlines into the 3-5 recurring themes the competitor is investing in.
3.  **Find the Gaps:** Identify topics, formats, or audience questions the competitor is not covering.
4.  **Brainstorm Counter-Content:** Propose content ideas that exploit those gaps or beat the competitor on their own pillars.";

const COMPETITOR_OUTPUT: &str = "\
**Final Output Requirement:**
Respond using exactly these headings:
## Content Pillars
A bullet list of the competitor's pillars, each with one sentence of evidence from the headlines.
## Content Gaps
A bullet list of gaps, each with one sentence on why it matters.
## Counter-Content Ideas
3 ideas, each with a headline, the best content format, and a one-sentence angle.

Do not include any extra conversational text or introductions.";

/// Render the content-plan prompt. Pure and deterministic.
///
/// Audience, goal and tone lines are only present when selected.
pub fn render_plan_prompt(input: &StrategyInput) -> String {
    let topic = input.topic.as_str();
    let mut prompt = String::new();

    prompt.push_str(PLAN_ROLE);
    prompt.push('\n');
    prompt.push_str(&format!(
        "Your client wants to create engaging content about the topic: \"{topic}\".\n"
    ));
    if let Some(audience) = input.audience {
        prompt.push_str(&format!("The target audience is: {audience}.\n"));
    }
    if let Some(goal) = input.goal {
        prompt.push_str(&format!("The primary goal of this content is: {goal}.\n"));
    }
    if let Some(tone) = input.tone {
        prompt.push_str(&format!("Write every idea in this tone of voice: {tone}.\n"));
    }
    prompt.push_str(
        "You have successfully retrieved real-time, related trending search queries from Google Trends to inform your strategy.\n\n",
    );

    prompt.push_str(&PLAN_TASK.replace("{topic}", topic));
    prompt.push_str("\n\n**Here is the real-time trending data from Google Trends:**\n---\n");
    prompt.push_str(&format_trend_table(&input.trends));
    prompt.push_str("---\n\n");
    prompt.push_str(PLAN_OUTPUT);
    prompt.push('\n');
    prompt
}

/// Render the competitor gap-analysis prompt. Pure and deterministic.
pub fn render_competitor_prompt(headlines: &[String]) -> String {
    let mut prompt = String::new();
    prompt.push_str(COMPETITOR_ROLE);
    prompt.push_str("\nBelow are the headlines currently published on a competitor's blog.\n\n");
    prompt.push_str(COMPETITOR_TASK);
    prompt.push_str("\n\n**Competitor headlines:**\n---\n");
    for headline in headlines {
        prompt.push_str("- ");
        prompt.push_str(headline);
        prompt.push('\n');
    }
    prompt.push_str("---\n\n");
    prompt.push_str(COMPETITOR_OUTPUT);
    prompt.push('\n');
    prompt
}

// --- Generator ---

/// Sends rendered prompts to the model. One attempt per call, no retry.
pub struct StrategyGenerator {
    model: Arc<dyn TextModel>,
}

impl StrategyGenerator {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    pub async fn generate_plan(&self, input: &StrategyInput) -> Result<String, StrategistError> {
        if input.topic.trim().is_empty() {
            return Err(StrategistError::Validation(
                "Please enter a content topic.".to_string(),
            ));
        }
        let prompt = render_plan_prompt(input);
        self.send("plan", &prompt).await
    }

    pub async fn generate_competitor_analysis(
        &self,
        headlines: &[String],
    ) -> Result<String, StrategistError> {
        if headlines.is_empty() {
            return Err(StrategistError::Validation(
                "No competitor headlines to analyze.".to_string(),
            ));
        }
        let prompt = render_competitor_prompt(headlines);
        self.send("competitor", &prompt).await
    }

    async fn send(&self, mode: &str, prompt: &str) -> Result<String, StrategistError> {
        let started = Instant::now();
        debug!(mode, prompt = %preview(prompt, 200), "Rendered prompt");

        match self.model.generate(prompt).await {
            Ok(text) => {
                info!(
                    mode,
                    model = self.model.model_name(),
                    prompt_chars = prompt.len(),
                    response_chars = text.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generated strategy"
                );
                Ok(text)
            }
            Err(e) => {
                warn!(mode, model = self.model.model_name(), error = %e, "Generation failed");
                Err(StrategistError::GenerationFailed(format!("{e:#}")))
            }
        }
    }
}
