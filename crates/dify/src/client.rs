//! Workflow run client: multipart upload plus streamed answer collection.

use {
    bytes::Bytes,
    futures::StreamExt,
    reqwest::{
        Client,
        multipart::{Form, Part},
    },
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, warn},
};

use crate::{
    config::DifyConfig,
    error::{Error, Result},
    stream::AnswerAggregator,
};

/// Multipart field the workflow expects the drawing under.
const IMAGE_FIELD: &str = "pipe_drawing_image";

/// Filename and MIME type attached to the upload.
const IMAGE_FILENAME: &str = "image.jpg";
const IMAGE_MIME: &str = "image/jpeg";

/// Prefix of the message produced when a workflow run fails; the failure
/// detail is appended.
pub const UPSTREAM_ERROR_PREFIX: &str =
    "Could not reach the analysis service, please try again later. Error: ";

/// Client for a single Dify workflow application.
#[derive(Clone)]
pub struct DifyClient {
    client: Client,
    api_key: Secret<String>,
    endpoint: String,
}

impl std::fmt::Debug for DifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DifyClient")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl DifyClient {
    #[must_use]
    pub fn new(config: &DifyConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Run the workflow on one drawing and collect the streamed answer.
    ///
    /// The configured endpoint is used as-is; Dify exposes one URL per
    /// application. An empty answer stream resolves to
    /// [`crate::stream::EMPTY_ANSWER_FALLBACK`].
    pub async fn run_workflow(&self, user: &str, image: Bytes) -> Result<String> {
        debug!(user, image_bytes = image.len(), "starting workflow run");

        let file_part = Part::bytes(image.to_vec())
            .file_name(IMAGE_FILENAME)
            .mime_str(IMAGE_MIME)?;

        let form = Form::new()
            .part(IMAGE_FIELD, file_part)
            .text("inputs", "{}")
            .text("response_mode", "streaming")
            .text("user", user.to_string())
            .text("conversation_id", "");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status, body));
        }

        let mut byte_stream = response.bytes_stream();
        let mut aggregator = AnswerAggregator::new();
        while let Some(chunk) = byte_stream.next().await {
            aggregator.push_chunk(&chunk?);
        }
        Ok(aggregator.finish())
    }

    /// Analyze one drawing, mapping any failure to a user-facing message.
    ///
    /// Runs are never retried; on failure the user gets the error detail
    /// and can resend the drawing.
    pub async fn analyze(&self, user: &str, image: Bytes) -> String {
        match self.run_workflow(user, image).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "workflow run failed");
                format!("{UPSTREAM_ERROR_PREFIX}{e}")
            },
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::stream::EMPTY_ANSWER_FALLBACK,
        mockito::Matcher,
    };

    fn test_client(endpoint: String) -> DifyClient {
        DifyClient::new(&DifyConfig::new("app-key", endpoint))
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = test_client("https://dify.example/run".into());
        let repr = format!("{client:?}");
        assert!(repr.contains("[REDACTED]"));
        assert!(!repr.contains("app-key"));
    }

    #[tokio::test]
    async fn uploads_drawing_and_collects_answer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer app-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="pipe_drawing_image"; filename="image.jpg""#.into()),
                Matcher::Regex("(?s)name=\"inputs\".*\\{\\}".into()),
                Matcher::Regex("(?s)name=\"response_mode\".*streaming".into()),
                Matcher::Regex("(?s)name=\"user\".*U1".into()),
            ]))
            .with_status(200)
            .with_body("data: {\"answer\":\"looks \"}\ndata: {\"answer\":\"fine\"}\n")
            .create_async()
            .await;

        let client = test_client(server.url());
        let answer = client
            .run_workflow("U1", Bytes::from_static(b"fake jpeg bytes"))
            .await
            .unwrap();
        assert_eq!(answer, "looks fine");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_answer_stream_resolves_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("data: {\"event\":\"workflow_finished\"}\n")
            .create_async()
            .await;

        let client = test_client(server.url());
        let answer = client
            .run_workflow("U1", Bytes::from_static(b"img"))
            .await
            .unwrap();
        assert_eq!(answer, EMPTY_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(502)
            .with_body("upstream worker crashed")
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client
            .run_workflow("U1", Bytes::from_static(b"img"))
            .await
            .unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status.as_u16(), 502);
                assert!(body.contains("upstream worker crashed"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_maps_api_failure_to_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = test_client(server.url());
        let answer = client.analyze("U1", Bytes::from_static(b"img")).await;
        assert!(answer.starts_with(UPSTREAM_ERROR_PREFIX));
        assert!(answer.contains("500"));
    }

    #[tokio::test]
    async fn analyze_maps_connect_failure_to_error_message() {
        // Port 0 is never connectable, so the request fails at the socket.
        let client = test_client("http://127.0.0.1:0/run".into());
        let answer = client.analyze("U1", Bytes::from_static(b"img")).await;
        assert!(answer.starts_with(UPSTREAM_ERROR_PREFIX));
    }
}
