use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use strategist_common::Config;
use strategist_engine::Strategist;

mod pages;
mod rest;

pub struct AppState {
    pub strategist: Strategist,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(|| async { "ok" }))
        // Form surface
        .route("/", get(pages::index_page))
        .route("/plan", post(pages::plan_submit))
        .route("/competitor", post(pages::competitor_submit))
        // JSON API
        .route("/api/plan", post(rest::api_plan))
        .route("/api/competitor", post(rest::api_competitor))
        .with_state(state)
        // Results are per-request; never cache them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path + status + latency
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("strategist=info".parse()?))
        .init();

    // Missing GEMINI_API_KEY stops the process here, before serving.
    let config = Config::from_env()?;
    config.log_redacted();

    let state = Arc::new(AppState {
        strategist: Strategist::from_config(&config)?,
    });

    let app = router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Strategist API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
