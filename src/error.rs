//! Error taxonomy for the scrape-summarize-post pipeline.
//!
//! Every stage reports failures through [`BotError`] so the orchestrator can
//! decide which ones abort the run and which ones merely degrade it. The
//! variants map one-to-one onto the failure classes the pipeline can hit:
//! transport problems, HTTP error statuses, absent page structure, wrong
//! media types, missing or rejected credentials, and post submission errors.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BotError>;

/// All failure classes the pipeline distinguishes.
#[derive(Debug, Error)]
pub enum BotError {
    /// The HTTP request itself failed (DNS, connect, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// A value scraped from the page could not be interpreted.
    #[error("parse failure: {0}")]
    Parse(String),

    /// An expected page element was absent. Not a hard error for callers;
    /// the orchestrator treats it as "nothing to post this run".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The image URL served something that is not an image.
    #[error("{url} served content type {content_type:?}, expected image/*")]
    InvalidContent { url: String, content_type: String },

    /// Posting credentials are missing or were rejected by the platform.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The posting API rejected the submission.
    #[error("post submission failed: {0}")]
    Publish(String),

    /// Startup configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Local file I/O (only reachable via `--save-icon`).
    #[error("could not write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BotError {
    /// Wrap a transport-level failure with the URL it happened on.
    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        BotError::Fetch {
            url: url.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_stage_context() {
        let err = BotError::InvalidContent {
            url: "https://example.com/icon".to_string(),
            content_type: "text/html".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/icon"));
        assert!(msg.contains("text/html"));
    }

    #[test]
    fn not_found_is_distinguishable() {
        let err = BotError::NotFound("condition icon");
        assert!(matches!(err, BotError::NotFound(_)));
        assert_eq!(err.to_string(), "condition icon not found");
    }
}
