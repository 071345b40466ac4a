//! Server-rendered form surface.
//!
//! One page: the plan form, the competitor form, and whichever result or
//! notice the last action produced.

use std::str::FromStr;
use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::warn;

use strategist_common::{Audience, Goal, PlanRequest, StrategistError, Tone};
use strategist_engine::{
    CompetitorOutcome, CompetitorReport, Notice, NoticeLevel, PlanOutcome, PlanReport,
};

use crate::AppState;

// --- Templates ---

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    topic: String,
    competitor_url: String,
    audiences: Vec<ChoiceView>,
    goals: Vec<ChoiceView>,
    tones: Vec<ChoiceView>,
    notice: Option<NoticeView>,
    plan: Option<PlanReport>,
    competitor: Option<CompetitorReport>,
}

/// One `<option>` of a select box.
struct ChoiceView {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

struct NoticeView {
    class: &'static str,
    message: String,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        let class = match notice.level {
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        Self {
            class,
            message: notice.message,
        }
    }
}

fn choices<T: Copy + PartialEq>(
    all: &[T],
    selected: Option<T>,
    slug: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
) -> Vec<ChoiceView> {
    all.iter()
        .map(|c| ChoiceView {
            value: slug(c),
            label: label(c),
            selected: selected == Some(*c),
        })
        .collect()
}

impl IndexTemplate {
    fn blank() -> Self {
        Self::with_selection(None, None, None)
    }

    fn with_selection(audience: Option<Audience>, goal: Option<Goal>, tone: Option<Tone>) -> Self {
        Self {
            topic: String::new(),
            competitor_url: String::new(),
            audiences: choices(&Audience::ALL, audience, Audience::slug, Audience::label),
            goals: choices(&Goal::ALL, goal, Goal::slug, Goal::label),
            tones: choices(&Tone::ALL, tone, Tone::slug, Tone::label),
            notice: None,
            plan: None,
            competitor: None,
        }
    }

    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                warn!(error = %e, "Template render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(format!("Template error: {e}")),
                )
                    .into_response()
            }
        }
    }
}

// --- Form bodies ---

#[derive(Deserialize)]
pub struct PlanForm {
    topic: String,
    #[serde(default)]
    audience: String,
    #[serde(default)]
    goal: String,
    #[serde(default)]
    tone: String,
}

#[derive(Deserialize)]
pub struct CompetitorForm {
    url: String,
}

/// Empty select value means "not specified".
fn optional_choice<T: FromStr<Err = StrategistError>>(raw: &str) -> Result<Option<T>, StrategistError> {
    let raw = raw.trim();
    if raw.is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

impl PlanForm {
    fn into_request(self) -> Result<PlanRequest, StrategistError> {
        Ok(PlanRequest {
            topic: self.topic,
            audience: optional_choice(&self.audience)?,
            goal: optional_choice(&self.goal)?,
            tone: optional_choice(&self.tone)?,
        })
    }
}

// --- Handlers ---

pub async fn index_page() -> Response {
    IndexTemplate::blank().into_response()
}

pub async fn plan_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PlanForm>,
) -> Response {
    let topic = form.topic.clone();
    let request = match form.into_request() {
        Ok(request) => request,
        Err(e) => {
            let mut page = IndexTemplate::blank();
            page.topic = topic;
            page.notice = Some(NoticeView {
                class: "error",
                message: e.user_message(),
            });
            return page.into_response();
        }
    };

    let mut page = IndexTemplate::with_selection(request.audience, request.goal, request.tone);
    page.topic = topic;

    let outcome = state.strategist.run_plan(request).await;
    page.notice = outcome.notice().map(NoticeView::from);
    if let PlanOutcome::Ready(report) = outcome {
        page.plan = Some(report);
    }
    page.into_response()
}

pub async fn competitor_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CompetitorForm>,
) -> Response {
    let mut page = IndexTemplate::blank();
    page.competitor_url = form.url.clone();

    let outcome = state.strategist.run_competitor(&form.url).await;
    page.notice = outcome.notice().map(NoticeView::from);
    if let CompetitorOutcome::Ready(report) = outcome {
        page.competitor = Some(report);
    }
    page.into_response()
}
