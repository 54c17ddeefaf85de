//! Binary entry point: parse arguments, resolve configuration, and either
//! run the pipeline once or stay resident behind the HTTP trigger.

use cge_tempo_bot::cli::Cli;
use cge_tempo_bot::config::Config;
use cge_tempo_bot::summarize::OpenAiSummarizer;
use cge_tempo_bot::{pipeline, server};
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("cge_tempo_bot starting up");

    let args = Cli::parse();
    debug!(?args.station_url, ?args.news_url, serve = args.serve, "Parsed CLI arguments");

    let config = Config::load(&args)?;
    info!(
        station_url = %config.station_url,
        news_url = %config.news_url,
        "Configuration resolved"
    );

    if args.serve {
        server::run_http_server(config, args.port).await?;
        return Ok(());
    }

    let client = pipeline::build_client(&config)?;
    let summarizer = OpenAiSummarizer::from_config(&client, &config);
    let save_icon = args.save_icon.as_deref().map(Path::new);

    match pipeline::run(&config, summarizer.as_ref(), save_icon).await {
        Ok(outcome) => {
            let elapsed = start_time.elapsed();
            info!(?elapsed, outcome = %outcome.describe(), "Run complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed; no post was created");
            Err(e.into())
        }
    }
}
