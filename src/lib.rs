//! # CGE Tempo Bot
//!
//! A scheduled bot that watches the CGE-SP (Centro de Gerenciamento de
//! Emergências Climáticas de São Paulo) public pages and posts the current
//! weather condition to Bluesky.
//!
//! ## Features
//!
//! - Recovers the condition-icon URL hidden inside the station page's inline
//!   `<style>` block (a CSS `background` declaration, not an `<img>` tag)
//! - Extracts the latest bulletin from the news page and optionally
//!   summarizes it through an OpenAI-compatible API into a short caption
//! - Publishes the icon with the caption to Bluesky via the AT Protocol
//!   (`createSession` → `uploadBlob` → `createRecord`), tagged `pt-BR` with
//!   alt text and a 16:9 aspect-ratio hint
//! - Runs once per invocation: either as a one-shot CLI for cron, or behind
//!   a small HTTP trigger (`--serve`) for a cloud scheduler
//!
//! ## Usage
//!
//! ```sh
//! BLUESKY_IDENTIFIER=bot.example.com BLUESKY_PASSWORD=... cge_tempo_bot
//! ```
//!
//! ## Architecture
//!
//! One linear pipeline per run:
//! 1. **Bulletin**: scrape the news page for the latest bulletin text
//! 2. **Icon**: scrape the station page's style block for the icon URL
//! 3. **Caption**: summarize the bulletin (best effort, never fatal)
//! 4. **Fetch**: download the icon and validate it is image content
//! 5. **Publish**: authenticate and post; the run's result is the post URI
//!
//! The first hard failure aborts the run; nothing is retried or persisted.

pub mod bluesky;
pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod scrapers;
pub mod server;
pub mod summarize;
pub mod utils;

pub use config::Config;
pub use error::{BotError, Result};
pub use pipeline::RunOutcome;
