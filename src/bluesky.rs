//! Bluesky publisher: session, blob upload, and the post record itself.
//!
//! The AT Protocol call sequence is `com.atproto.server.createSession`
//! (handle + app password), `com.atproto.repo.uploadBlob` (raw image bytes),
//! then `com.atproto.repo.createRecord` with an `app.bsky.feed.post` record
//! embedding the uploaded blob. Credentials are checked for presence before
//! the first request goes out; a credential-less invocation must fail
//! without touching the network.

use crate::config::{AspectRatio, Config};
use crate::error::{BotError, Result};
use crate::utils::truncate_chars;
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};
use url::Url;

/// The platform caps post text at 300 characters; the caption is clamped
/// rather than rejected.
const POST_TEXT_LIMIT: usize = 300;

/// Placeholder used when no caption was produced; the platform requires
/// non-empty post text.
const EMPTY_CAPTION: &str = " ";

pub struct BlueskyPublisher {
    client: Client,
    service: Url,
    identifier: String,
    password: String,
    lang: String,
    alt_text: String,
    aspect_ratio: AspectRatio,
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: String,
    did: String,
}

/// The blob descriptor is carried through opaquely; the server echoes it
/// back inside the record and its exact shape is its own business.
#[derive(Deserialize)]
struct UploadBlobResponse {
    blob: serde_json::Value,
}

#[derive(Deserialize)]
struct CreateRecordResponse {
    uri: String,
}

impl BlueskyPublisher {
    pub fn from_config(client: &Client, config: &Config) -> Self {
        BlueskyPublisher {
            client: client.clone(),
            service: config.bluesky_service.clone(),
            identifier: config.bluesky_identifier.clone(),
            password: config.bluesky_password.clone(),
            lang: config.post_lang.clone(),
            alt_text: config.icon_alt_text.clone(),
            aspect_ratio: config.aspect_ratio,
        }
    }

    fn xrpc_url(&self, nsid: &str) -> String {
        format!("{}/xrpc/{nsid}", self.service.as_str().trim_end_matches('/'))
    }

    /// Authenticate and publish the image with its caption.
    ///
    /// Returns the AT-URI of the created post. Fails with
    /// [`BotError::Auth`] before any network call when either credential is
    /// missing, and with [`BotError::Publish`] when the upload or the record
    /// creation is rejected. Nothing is retried.
    #[instrument(level = "info", skip_all, fields(identifier = %self.identifier))]
    pub async fn post_image(
        &self,
        bytes: Bytes,
        mime: &str,
        caption: Option<&str>,
    ) -> Result<String> {
        if self.identifier.is_empty() || self.password.is_empty() {
            return Err(BotError::Auth(
                "BLUESKY_IDENTIFIER and BLUESKY_PASSWORD must both be set".to_string(),
            ));
        }

        let session = self.create_session().await?;
        let blob = self.upload_blob(&session.access_jwt, bytes, mime).await?;
        let uri = self.create_record(&session, blob, caption).await?;
        info!(post_uri = %uri, "Post created");
        Ok(uri)
    }

    async fn create_session(&self) -> Result<CreateSessionResponse> {
        let url = self.xrpc_url("com.atproto.server.createSession");
        let response = self
            .client
            .post(&url)
            .json(&CreateSessionRequest {
                identifier: &self.identifier,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| BotError::fetch(url.as_str(), e))?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = api_error_detail(response).await;
            return Err(BotError::Auth(format!(
                "createSession returned {status}: {detail}"
            )));
        }
        response.json().await.map_err(|e| BotError::fetch(url.as_str(), e))
    }

    async fn upload_blob(
        &self,
        access_jwt: &str,
        bytes: Bytes,
        mime: &str,
    ) -> Result<serde_json::Value> {
        let url = self.xrpc_url("com.atproto.repo.uploadBlob");
        let response = self
            .client
            .post(&url)
            .bearer_auth(access_jwt)
            .header(CONTENT_TYPE, mime)
            .body(bytes)
            .send()
            .await
            .map_err(|e| BotError::fetch(url.as_str(), e))?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = api_error_detail(response).await;
            return Err(BotError::Publish(format!(
                "uploadBlob returned {status}: {detail}"
            )));
        }
        let body: UploadBlobResponse =
            response.json().await.map_err(|e| BotError::fetch(url.as_str(), e))?;
        Ok(body.blob)
    }

    async fn create_record(
        &self,
        session: &CreateSessionResponse,
        blob: serde_json::Value,
        caption: Option<&str>,
    ) -> Result<String> {
        let text = match caption {
            Some(c) if !c.trim().is_empty() => truncate_chars(c.trim(), POST_TEXT_LIMIT),
            _ => EMPTY_CAPTION.to_string(),
        };
        let record = json!({
            "$type": "app.bsky.feed.post",
            "text": text,
            "createdAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "langs": [self.lang],
            "embed": {
                "$type": "app.bsky.embed.images",
                "images": [{
                    "image": blob,
                    "alt": self.alt_text,
                    "aspectRatio": {
                        "width": self.aspect_ratio.width,
                        "height": self.aspect_ratio.height,
                    },
                }],
            },
        });
        let body = json!({
            "repo": session.did,
            "collection": "app.bsky.feed.post",
            "record": record,
        });

        let url = self.xrpc_url("com.atproto.repo.createRecord");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.access_jwt)
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::fetch(url.as_str(), e))?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = api_error_detail(response).await;
            return Err(BotError::Publish(format!(
                "createRecord returned {status}: {detail}"
            )));
        }
        let created: CreateRecordResponse =
            response.json().await.map_err(|e| BotError::fetch(url.as_str(), e))?;
        Ok(created.uri)
    }
}

/// Pull the human-readable message out of an XRPC error body, falling back
/// to the raw text.
async fn api_error_detail(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct XrpcError {
        #[serde(default)]
        error: String,
        #[serde(default)]
        message: String,
    }

    let raw = response.text().await.unwrap_or_default();
    if let Ok(parsed) = serde_json::from_str::<XrpcError>(&raw) {
        if !parsed.message.is_empty() {
            return parsed.message;
        }
        if !parsed.error.is_empty() {
            return parsed.error;
        }
    }
    crate::utils::truncate_for_log(&raw, 200)
}
