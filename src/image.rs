//! Fetcher for the resolved condition-icon image.
//!
//! The bytes are held in memory and handed straight to the publisher;
//! nothing touches disk unless the operator asked for `--save-icon`.

use crate::error::{BotError, Result};
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{info, instrument};
use url::Url;

/// Fetch the icon and validate that the server actually served an image.
///
/// A `200 OK` with a non-`image/*` content type (the station serves an HTML
/// error page under some outages) is rejected; posting without real image
/// bytes is never attempted. Returns the raw bytes and the bare MIME type
/// with any `; charset=...` parameters stripped.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_icon(client: &Client, url: &Url) -> Result<(Bytes, String)> {
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

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(BotError::InvalidContent {
            url: url.to_string(),
            content_type,
        });
    }
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or(&content_type)
        .trim()
        .to_string();

    let bytes = response
        .bytes()
        .await
        .map_err(|e| BotError::fetch(url.as_str(), e))?;
    info!(bytes = bytes.len(), %mime, "Fetched condition icon");
    Ok((bytes, mime))
}
