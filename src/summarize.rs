//! Best-effort caption generation through an OpenAI-compatible API.
//!
//! Summarization is modeled as a capability the pipeline may or may not
//! have: the [`Summarizer`] trait returns `Option<String>` and the
//! orchestrator accepts `Option<&S>`, so a run without an API key (or with a
//! failing backend) composes exactly like a run with one and simply posts
//! without a caption. No failure here ever aborts the run, and no request is
//! retried.

use crate::config::Config;
use crate::error::{BotError, Result};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};
use url::Url;

/// Fixed instruction for the caption model. Keeps the output in the
/// bulletin's own language, preserves figures and alerts, and bounds the
/// length to a social caption.
const SYSTEM_PROMPT: &str = "Você resume boletins meteorológicos para uma legenda de rede social. \
     Responda no mesmo idioma do texto recebido, em no máximo 300 caracteres. \
     Preserve os números (temperaturas, volumes de chuva, horários) e qualquer \
     alerta ou estado de atenção. Responda apenas com o resumo, sem comentários.";

const TEMPERATURE: f64 = 0.45;
const TOP_P: f64 = 0.95;
const MAX_TOKENS: u32 = 460;

/// A capability that turns bulletin text into a short caption.
pub trait Summarizer {
    /// Summarize `text`, or return `None` when no usable caption was
    /// produced for any reason.
    async fn summarize(&self, text: &str) -> Option<String>;
}

/// Summarizer backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug)]
pub struct OpenAiSummarizer {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiSummarizer {
    /// Build the summarizer from configuration, or `None` when no API key is
    /// configured.
    pub fn from_config(client: &Client, config: &Config) -> Option<Self> {
        if config.llm_api_key.is_empty() {
            info!("No LLM API key configured; captions disabled");
            return None;
        }
        Some(OpenAiSummarizer {
            client: client.clone(),
            endpoint: config.llm_endpoint.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    async fn complete(&self, text: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.endpoint.as_str().trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::fetch(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BotError::Status { url, status });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| BotError::fetch(url.as_str(), e))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        Ok(content.trim().to_string())
    }
}

impl Summarizer for OpenAiSummarizer {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn summarize(&self, text: &str) -> Option<String> {
        let t0 = Instant::now();
        match self.complete(text).await {
            Ok(summary) if summary.is_empty() => {
                warn!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Model returned an empty caption; posting without one"
                );
                None
            }
            Ok(summary) => {
                info!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    caption = %truncate_for_log(&summary, 120),
                    "Caption generated"
                );
                Some(summary)
            }
            Err(e) => {
                warn!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    error = %e,
                    "Summarization failed; posting without a caption"
                );
                None
            }
        }
    }
}
