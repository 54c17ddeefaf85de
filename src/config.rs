//! Runtime configuration for the pipeline.
//!
//! Everything the orchestrator needs travels in one explicit [`Config`]
//! value: the pages to scrape, the posting service and its credentials, the
//! summarizer endpoint, and the fixed post metadata. Nothing is read from
//! ambient globals after startup, which keeps the pipeline runnable against
//! arbitrary endpoints in tests.
//!
//! Precedence, lowest to highest: built-in defaults, the optional YAML file
//! named by `--config`, then command-line flags (which also cover the
//! `BLUESKY_IDENTIFIER` / `BLUESKY_PASSWORD` / `LLM_API_KEY` environment
//! variables via clap).

use crate::cli::Cli;
use crate::error::{BotError, Result};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Weather-station page carrying the condition icon in its inline style.
pub const DEFAULT_STATION_URL: &str = "https://www.cgesp.org/v3/estacoes-meteorologicas.jsp";
/// News page carrying the latest bulletin.
pub const DEFAULT_NEWS_URL: &str = "https://www.cgesp.org/v3/noticias.jsp";

const DEFAULT_BLUESKY_SERVICE: &str = "https://bsky.social";
const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_POST_LANG: &str = "pt-BR";
const DEFAULT_ICON_ALT: &str =
    "Ícone representando a condição do tempo atual na cidade de São Paulo";
const DEFAULT_NEWS_CHAR_BUDGET: usize = 2000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Aspect-ratio hint attached to the posted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio {
            width: 16,
            height: 9,
        }
    }
}

/// Optional YAML overrides, all fields omissible.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub station_url: Option<String>,
    pub news_url: Option<String>,
    pub bluesky_service: Option<String>,
    pub llm_endpoint: Option<String>,
    pub llm_model: Option<String>,
    pub post_lang: Option<String>,
    pub icon_alt_text: Option<String>,
    pub aspect_ratio: Option<AspectRatio>,
    pub news_char_budget: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

/// Fully resolved configuration handed to the orchestrator.
///
/// Credentials may be empty; their absence is detected by the publisher
/// before any network call rather than treated as a startup crash, so a
/// credential-less invocation still reports a clean failure. An empty
/// `llm_api_key` simply disables summarization.
#[derive(Debug, Clone)]
pub struct Config {
    pub station_url: Url,
    pub news_url: Url,
    pub bluesky_service: Url,
    pub bluesky_identifier: String,
    pub bluesky_password: String,
    pub llm_endpoint: Url,
    pub llm_model: String,
    pub llm_api_key: String,
    pub post_lang: String,
    pub icon_alt_text: String,
    pub aspect_ratio: AspectRatio,
    pub news_char_budget: usize,
    pub request_timeout: Duration,
}

impl Config {
    /// Resolve the final configuration from defaults, the optional YAML file,
    /// and CLI/environment values.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| BotError::Config(format!("cannot read {path}: {e}")))?;
                serde_yaml::from_str::<FileConfig>(&raw)
                    .map_err(|e| BotError::Config(format!("cannot parse {path}: {e}")))?
            }
            None => FileConfig::default(),
        };
        Self::resolve(cli, file)
    }

    fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
        let station_url = pick(&cli.station_url, file.station_url, DEFAULT_STATION_URL);
        let news_url = pick(&cli.news_url, file.news_url, DEFAULT_NEWS_URL);
        let bluesky_service = pick(&None, file.bluesky_service, DEFAULT_BLUESKY_SERVICE);
        let llm_endpoint = pick(&None, file.llm_endpoint, DEFAULT_LLM_ENDPOINT);

        Ok(Config {
            station_url: parse_url("station_url", &station_url)?,
            news_url: parse_url("news_url", &news_url)?,
            bluesky_service: parse_url("bluesky_service", &bluesky_service)?,
            bluesky_identifier: cli.bluesky_identifier.clone().unwrap_or_default(),
            bluesky_password: cli.bluesky_password.clone().unwrap_or_default(),
            llm_endpoint: parse_url("llm_endpoint", &llm_endpoint)?,
            llm_model: file.llm_model.unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_api_key: cli.llm_api_key.clone().unwrap_or_default(),
            post_lang: file.post_lang.unwrap_or_else(|| DEFAULT_POST_LANG.to_string()),
            icon_alt_text: file
                .icon_alt_text
                .unwrap_or_else(|| DEFAULT_ICON_ALT.to_string()),
            aspect_ratio: file.aspect_ratio.unwrap_or_default(),
            news_char_budget: file.news_char_budget.unwrap_or(DEFAULT_NEWS_CHAR_BUDGET),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

fn pick(cli_value: &Option<String>, file_value: Option<String>, default: &str) -> String {
    cli_value
        .clone()
        .or(file_value)
        .unwrap_or_else(|| default.to_string())
}

fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| BotError::Config(format!("{name} {value:?} is not a URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn bare_cli() -> Cli {
        Cli::parse_from(["cge_tempo_bot"])
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&bare_cli(), FileConfig::default()).unwrap();
        assert_eq!(config.station_url.as_str(), DEFAULT_STATION_URL);
        assert_eq!(config.news_url.as_str(), DEFAULT_NEWS_URL);
        assert_eq!(config.post_lang, "pt-BR");
        assert_eq!(config.aspect_ratio, AspectRatio::default());
        assert_eq!(config.news_char_budget, 2000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let file: FileConfig = serde_yaml::from_str(
            r#"
station_url: "https://staging.example.com/estacoes.jsp"
llm_model: "gpt-4.1-mini"
aspect_ratio:
  width: 4
  height: 3
news_char_budget: 500
"#,
        )
        .unwrap();
        let config = Config::resolve(&bare_cli(), file).unwrap();
        assert_eq!(
            config.station_url.as_str(),
            "https://staging.example.com/estacoes.jsp"
        );
        assert_eq!(config.llm_model, "gpt-4.1-mini");
        assert_eq!(config.aspect_ratio, AspectRatio { width: 4, height: 3 });
        assert_eq!(config.news_char_budget, 500);
        // Untouched fields keep their defaults.
        assert_eq!(config.news_url.as_str(), DEFAULT_NEWS_URL);
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let cli = Cli::parse_from([
            "cge_tempo_bot",
            "--station-url",
            "https://cli.example.com/page.jsp",
        ]);
        let file: FileConfig =
            serde_yaml::from_str(r#"station_url: "https://file.example.com/page.jsp""#).unwrap();
        let config = Config::resolve(&cli, file).unwrap();
        assert_eq!(config.station_url.as_str(), "https://cli.example.com/page.jsp");
    }

    #[test]
    fn test_invalid_url_is_a_config_error() {
        let cli = Cli::parse_from(["cge_tempo_bot", "--station-url", "not a url"]);
        let err = Config::resolve(&cli, FileConfig::default()).unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }

    #[test]
    fn test_unknown_yaml_field_rejected() {
        let parsed: std::result::Result<FileConfig, _> =
            serde_yaml::from_str(r#"staton_url: "typo""#);
        assert!(parsed.is_err());
    }
}
