use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Credentials for one LINE Messaging API channel.
#[derive(Clone, Serialize, Deserialize)]
pub struct LineConfig {
    /// Channel secret, the HMAC key for webhook signatures.
    #[serde(serialize_with = "serialize_secret")]
    pub channel_secret: Secret<String>,

    /// Long-lived channel access token for Messaging API calls.
    #[serde(serialize_with = "serialize_secret")]
    pub access_token: Secret<String>,
}

impl LineConfig {
    #[must_use]
    pub fn new(channel_secret: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            channel_secret: Secret::new(channel_secret.into()),
            access_token: Secret::new(access_token.into()),
        }
    }
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field("channel_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
