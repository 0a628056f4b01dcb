//! Outbound Messaging API client: replies, pushes, content downloads.

use {
    bytes::Bytes,
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    serde_json::json,
    tracing::debug,
};

use crate::{
    config::LineConfig,
    error::{Error, Result},
};

/// Messaging API base URL.
const API_BASE: &str = "https://api.line.me";

/// Content delivery base URL; message bodies are served from a separate host.
const CONTENT_BASE: &str = "https://api-data.line.me";

/// Client for the LINE Messaging API.
#[derive(Clone)]
pub struct LineClient {
    client: Client,
    access_token: Secret<String>,
    api_base: String,
    content_base: String,
}

impl std::fmt::Debug for LineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineClient")
            .field("access_token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("content_base", &self.content_base)
            .finish_non_exhaustive()
    }
}

impl LineClient {
    #[must_use]
    pub fn new(config: &LineConfig) -> Self {
        Self {
            client: Client::new(),
            access_token: config.access_token.clone(),
            api_base: API_BASE.into(),
            content_base: CONTENT_BASE.into(),
        }
    }

    /// Override both base URLs, for tests against a local mock server.
    #[must_use]
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        content_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.content_base = content_base.into();
        self
    }

    /// Reply to an event with a single text message.
    ///
    /// Reply tokens are one-shot and expire shortly after delivery, so this
    /// is called before any slow work.
    pub async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        debug!(reply_token, "sending reply message");
        let body = json!({
            "replyToken": reply_token,
            "messages": [{"type": "text", "text": text}],
        });
        self.post_message("/v2/bot/message/reply", &body).await
    }

    /// Push a text message to a user outside any reply window.
    pub async fn push(&self, to: &str, text: &str) -> Result<()> {
        debug!(to, "sending push message");
        let body = json!({
            "to": to,
            "messages": [{"type": "text", "text": text}],
        });
        self.post_message("/v2/bot/message/push", &body).await
    }

    /// Download the binary content of a received message.
    pub async fn message_content(&self, message_id: &str) -> Result<Bytes> {
        debug!(message_id, "fetching message content");
        let response = self
            .client
            .get(format!(
                "{}/v2/bot/message/{message_id}/content",
                self.content_base
            ))
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status, body));
        }

        Ok(response.bytes().await?)
    }

    async fn post_message(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(format!("{}{path}", self.api_base))
            .bearer_auth(self.access_token.expose_secret())
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status, body));
        }

        Ok(())
    }
}
