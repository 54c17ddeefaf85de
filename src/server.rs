//! HTTP trigger for the deployed form of the bot.
//!
//! The external scheduler POSTs to `/run`; the handler executes one full
//! pipeline run and answers with a status line: `200` when a post was
//! created, `500` otherwise. `/health` is a plain liveness probe.

use crate::config::Config;
use crate::pipeline;
use crate::summarize::OpenAiSummarizer;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// GET /health - liveness probe for the scheduler
async fn health_check() -> &'static str {
    "ok"
}

/// POST /run - trigger one pipeline run
async fn trigger_run(State(state): State<AppState>) -> (StatusCode, String) {
    let client = match pipeline::build_client(&state.config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Run failed before start");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {e}\n"));
        }
    };
    let summarizer = OpenAiSummarizer::from_config(&client, &state.config);

    match pipeline::run(&state.config, summarizer.as_ref(), None).await {
        Ok(outcome) => {
            let line = outcome.describe();
            info!(%line, "Triggered run succeeded");
            (StatusCode::OK, format!("{line}\n"))
        }
        Err(e) => {
            error!(error = %e, "Triggered run failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {e}\n"))
        }
    }
}

/// Create the HTTP router
pub fn create_router(config: Arc<Config>) -> Router {
    let state = AppState { config };

    Router::new()
        .route("/health", get(health_check))
        .route("/run", post(trigger_run))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run_http_server(config: Config, port: u16) -> Result<(), std::io::Error> {
    let app = create_router(Arc::new(config));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(port, "HTTP trigger listening");

    axum::serve(listener, app).await
}
