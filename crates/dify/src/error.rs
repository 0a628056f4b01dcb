use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Dify API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl Error {
    #[must_use]
    pub fn api(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
