//! Shared request-handling state.

use {pipesage_dify::DifyClient, pipesage_line::LineClient, secrecy::Secret};

use crate::config::RelayConfig;

/// State shared by all routes, handed to axum behind an `Arc`.
///
/// Fields are public so tests can assemble a state whose clients point at a
/// local mock server.
pub struct AppState {
    pub line: LineClient,
    pub dify: DifyClient,
    /// HMAC key for webhook signature verification.
    pub channel_secret: Secret<String>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            line: LineClient::new(&config.line),
            dify: DifyClient::new(&config.dify),
            channel_secret: config.line.channel_secret.clone(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("line", &self.line)
            .field("dify", &self.dify)
            .field("channel_secret", &"[REDACTED]")
            .finish()
    }
}
