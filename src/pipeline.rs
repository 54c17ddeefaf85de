//! The run orchestrator: one linear pass from scrape to post.
//!
//! Stage order: bulletin text, condition-icon URL, optional summarization,
//! image bytes, publish. The first hard failure aborts the run; a missing
//! bulletin only degrades it to a captionless post. No stage is retried and
//! nothing runs concurrently.

use crate::bluesky::BlueskyPublisher;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::image::fetch_icon;
use crate::scrapers::{condition, noticias};
use crate::summarize::Summarizer;
use reqwest::Client;
use std::path::Path;
use tracing::{info, instrument, warn};

/// What a successful run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// A post was created; carries its AT-URI.
    Posted { uri: String },
    /// `--save-icon` was given: the icon went to disk and no post was made.
    Saved { path: String },
}

impl RunOutcome {
    pub fn describe(&self) -> String {
        match self {
            RunOutcome::Posted { uri } => format!("posted {uri}"),
            RunOutcome::Saved { path } => format!("saved icon to {path}"),
        }
    }
}

/// Build the HTTP client every network stage shares for one run.
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("cge_tempo_bot/", env!("CARGO_PKG_VERSION")))
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| BotError::Config(format!("cannot build HTTP client: {e}")))
}

/// Execute the full pipeline once.
///
/// `summarizer` is an optional capability; without one (or when it fails)
/// the post goes out captionless. `save_icon` short-circuits before the
/// publish stage for local debugging.
#[instrument(level = "info", skip_all)]
pub async fn run<S: Summarizer>(
    config: &Config,
    summarizer: Option<&S>,
    save_icon: Option<&Path>,
) -> Result<RunOutcome> {
    let client = build_client(config)?;

    let news = noticias::scrape_news(&client, &config.news_url, config.news_char_budget).await?;
    if news.is_none() {
        warn!("Proceeding without bulletin text; the post will have no caption");
    }

    let icon_url = condition::scrape_icon_url(&client, &config.station_url)
        .await?
        .ok_or(BotError::NotFound("condition icon"))?;

    let caption = match (&news, summarizer) {
        (Some(text), Some(s)) => s.summarize(text).await,
        _ => None,
    };

    let (bytes, mime) = fetch_icon(&client, &icon_url).await?;

    if let Some(path) = save_icon {
        tokio::fs::write(path, &bytes).await.map_err(|e| BotError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        info!(path = %path.display(), bytes = bytes.len(), "Icon saved; skipping publish");
        return Ok(RunOutcome::Saved {
            path: path.display().to_string(),
        });
    }

    let publisher = BlueskyPublisher::from_config(&client, config);
    let uri = publisher.post_image(bytes, &mime, caption.as_deref()).await?;
    Ok(RunOutcome::Posted { uri })
}
