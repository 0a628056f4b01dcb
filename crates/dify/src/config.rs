use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Connection settings for one Dify workflow application.
#[derive(Clone, Serialize, Deserialize)]
pub struct DifyConfig {
    /// Application API key.
    #[serde(serialize_with = "serialize_secret")]
    pub api_key: Secret<String>,

    /// Full URL of the workflow run endpoint; requests post to it as-is.
    pub endpoint: String,
}

impl DifyConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            endpoint: endpoint.into(),
        }
    }
}

impl std::fmt::Debug for DifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DifyConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
