//! Scrapers for the CGE-SP public pages.
//!
//! Each submodule pulls one value out of one page:
//!
//! | Page | Module | Extracted value |
//! |------|--------|-----------------|
//! | Weather stations | [`condition`] | Absolute URL of the condition icon, recovered from an inline `<style>` block |
//! | News | [`noticias`] | Latest bulletin text, collapsed and truncated |
//!
//! Both scrapers are split into a fetching function (network) and a pure
//! extraction function over the HTML string, so the matching strategy can be
//! exercised and swapped without touching the pipeline.

pub mod condition;
pub mod noticias;

use crate::error::{BotError, Result};
use reqwest::Client;
use url::Url;

/// GET a page and return its body, mapping transport and status failures to
/// the pipeline error types.
pub(crate) async fn fetch_page_text(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| BotError::fetch(url.as_str(), e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(BotError::Status {
            url: url.to_string(),
            status,
        });
    }
    response
        .text()
        .await
        .map_err(|e| BotError::fetch(url.as_str(), e))
}
