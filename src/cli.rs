//! Command-line interface definitions for the CGE weather bot.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Secrets are taken from environment variables so the deployed scheduler
//! never passes them on the command line.

use clap::Parser;

/// Command-line arguments for the CGE weather bot.
///
/// A plain invocation runs the pipeline once and exits; `--serve` keeps the
/// process alive behind an HTTP trigger instead.
///
/// # Examples
///
/// ```sh
/// # One-shot run against the real endpoints
/// BLUESKY_IDENTIFIER=bot.example.com BLUESKY_PASSWORD=... cge_tempo_bot
///
/// # Fetch the icon locally without posting
/// cge_tempo_bot --save-icon /tmp/condicao.png
///
/// # Cloud-function shape: POST /run triggers a pipeline run
/// cge_tempo_bot --serve --port 8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Weather-station page scraped for the condition icon
    #[arg(long)]
    pub station_url: Option<String>,

    /// News page scraped for the latest bulletin
    #[arg(long)]
    pub news_url: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Bluesky handle or DID used to create the posting session
    #[arg(long, env = "BLUESKY_IDENTIFIER")]
    pub bluesky_identifier: Option<String>,

    /// Bluesky app password
    #[arg(long, env = "BLUESKY_PASSWORD", hide_env_values = true)]
    pub bluesky_password: Option<String>,

    /// API key for the summarization endpoint; summarization is skipped when unset
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Write the fetched icon to this path and skip posting
    #[arg(long)]
    pub save_icon: Option<String>,

    /// Run as an HTTP service exposing POST /run instead of a one-shot invocation
    #[arg(long)]
    pub serve: bool,

    /// Listen port for --serve
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["cge_tempo_bot"]);
        assert!(cli.station_url.is_none());
        assert!(cli.news_url.is_none());
        assert!(cli.save_icon.is_none());
        assert!(!cli.serve);
        assert_eq!(cli.port, 8080);
    }

    #[test]
    fn test_cli_url_overrides() {
        let cli = Cli::parse_from([
            "cge_tempo_bot",
            "--station-url",
            "https://example.com/estacoes.jsp",
            "--news-url",
            "https://example.com/noticias.jsp",
        ]);
        assert_eq!(
            cli.station_url.as_deref(),
            Some("https://example.com/estacoes.jsp")
        );
        assert_eq!(
            cli.news_url.as_deref(),
            Some("https://example.com/noticias.jsp")
        );
    }

    #[test]
    fn test_cli_serve_mode() {
        let cli = Cli::parse_from(["cge_tempo_bot", "--serve", "--port", "9000"]);
        assert!(cli.serve);
        assert_eq!(cli.port, 9000);
    }
}
