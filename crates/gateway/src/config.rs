//! Process configuration, resolved once at startup.

use {pipesage_dify::DifyConfig, pipesage_line::LineConfig};

pub const ENV_LINE_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
pub const ENV_LINE_CHANNEL_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const ENV_DIFY_API_KEY: &str = "DIFY_API_KEY";
pub const ENV_DIFY_API_URL: &str = "DIFY_API_URL";

/// A required environment variable is unset or empty.
#[derive(Debug, thiserror::Error)]
#[error("specify {0} as an environment variable")]
pub struct MissingVar(pub &'static str);

/// Everything the relay needs, passed down explicitly instead of read from
/// ambient globals.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub line: LineConfig,
    pub dify: DifyConfig,
}

impl RelayConfig {
    /// Read the four required variables from the process environment.
    pub fn from_env() -> Result<Self, MissingVar> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an injectable lookup. The separate
    /// signature makes this testable without mutating the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MissingVar> {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(MissingVar(name))
        };

        Ok(Self {
            line: LineConfig::new(
                require(ENV_LINE_CHANNEL_SECRET)?,
                require(ENV_LINE_CHANNEL_ACCESS_TOKEN)?,
            ),
            dify: DifyConfig::new(require(ENV_DIFY_API_KEY)?, require(ENV_DIFY_API_URL)?),
        })
    }
}
