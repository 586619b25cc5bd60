//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use breedmatch_core::domain::{MatchRequest, PromptTemplate};
use breedmatch_core::ports::{BreedMatcher, MatchError};

/// Inference API configuration.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    /// Base URL without the `/v1/messages` path.
    pub base_url: String,
    /// Value of the `anthropic-version` header.
    pub api_version: String,
    pub model: String,
    pub max_tokens: u32,
    /// Bound on each outbound call, connect through body.
    pub timeout: Duration,
    /// Extra attempts after a transport error or 5xx. Zero disables retries.
    pub max_retries: u32,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 500,
            timeout: Duration::from_secs(30),
            max_retries: 0,
        }
    }

    /// Load configuration from environment variables. `None` when
    /// `ANTHROPIC_API_KEY` is unset.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())?;
        let defaults = Self::new(api_key);

        Some(Self {
            base_url: std::env::var("ANTHROPIC_API_URL").unwrap_or(defaults.base_url.clone()),
            api_version: std::env::var("ANTHROPIC_VERSION")
                .unwrap_or(defaults.api_version.clone()),
            model: std::env::var("ANTHROPIC_MODEL").unwrap_or(defaults.model.clone()),
            max_tokens: std::env::var("ANTHROPIC_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            timeout: std::env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            max_retries: std::env::var("INFERENCE_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            ..defaults
        })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: [ContentBlock<'a>; 2],
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: &'a str,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Breed matcher backed by the Anthropic Messages API.
///
/// Sends the image and a prompt rendered from the caller's catalog, then
/// relays the API's JSON body untouched.
pub struct AnthropicMatcher {
    client: reqwest::Client,
    config: AnthropicConfig,
    prompt: PromptTemplate,
}

impl AnthropicMatcher {
    pub fn new(config: AnthropicConfig, prompt: PromptTemplate) -> Result<Self, MatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MatchError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            config,
            prompt,
        })
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn build_body<'a>(&'a self, request: &'a MatchRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [Message {
                role: "user",
                content: [
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: request.mime_type.as_str(),
                            data: &request.image_base64,
                        },
                    },
                    ContentBlock::Text {
                        text: self.prompt.render(&request.slug_list),
                    },
                ],
            }],
        }
    }

    async fn send_once(&self, body: &MessagesRequest<'_>) -> Result<Map<String, Value>, MatchError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(body)
            .send()
            .await
            .map_err(|e| MatchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are best-effort; an unreadable one just loses the message.
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|envelope| envelope.error.message);
            return Err(MatchError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        match response
            .json::<Value>()
            .await
            .map_err(|e| MatchError::InvalidResponse(e.to_string()))?
        {
            Value::Object(map) => Ok(map),
            other => Err(MatchError::InvalidResponse(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    fn is_retryable(err: &MatchError) -> bool {
        match err {
            MatchError::Transport(_) => true,
            MatchError::Upstream { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[async_trait]
impl BreedMatcher for AnthropicMatcher {
    async fn match_breed(&self, request: &MatchRequest) -> Result<Map<String, Value>, MatchError> {
        let body = self.build_body(request);
        let mut attempt = 0;

        loop {
            match self.send_once(&body).await {
                Err(e) if attempt < self.config.max_retries && Self::is_retryable(&e) => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        error = %e,
                        "Inference call failed, retrying"
                    );
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn request() -> MatchRequest {
        MatchRequest::parse(
            Some("aGVsbG8=".to_string()),
            Some("image/jpeg".to_string()),
            Some("beagle,boxer,golden-retriever".to_string()),
        )
        .unwrap()
    }

    fn matcher(base_url: String, max_retries: u32) -> AnthropicMatcher {
        let config = AnthropicConfig {
            base_url,
            max_retries,
            timeout: Duration::from_secs(5),
            ..AnthropicConfig::new("test-key")
        };
        AnthropicMatcher::new(config, PromptTemplate::default()).unwrap()
    }

    #[tokio::test]
    async fn test_sends_image_and_prompt_with_headers() {
        let mut server = Server::new_async().await;
        let upstream = json!({
            "id": "msg_1",
            "type": "message",
            "content": [{"type": "text", "text": "{\"breed_slug\":\"beagle\",\"match_percentage\":88}"}]
        });
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 500
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(upstream.to_string())
            .create_async()
            .await;

        let body = matcher(server.url(), 0).match_breed(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(Value::Object(body), upstream);
    }

    #[test]
    fn test_body_has_image_then_prompt() {
        let matcher = matcher("http://localhost".to_string(), 0);
        let req = request();
        let body = serde_json::to_value(matcher.build_body(&req)).unwrap();
        let content = &body["messages"][0]["content"];

        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(
            content[0],
            json!({
                "type": "image",
                "source": {"type": "base64", "media_type": "image/jpeg", "data": "aGVsbG8="}
            })
        );
        assert_eq!(content[1]["type"], "text");
        let text = content[1]["text"].as_str().unwrap();
        assert!(text.contains("beagle,boxer,golden-retriever"));
    }

    #[tokio::test]
    async fn test_upstream_error_message_is_relayed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#)
            .create_async()
            .await;

        let err = matcher(server.url(), 0).match_breed(&request()).await.unwrap_err();
        match err {
            MatchError::Upstream { status, message } => {
                assert_eq!(status, 529);
                assert_eq!(message.as_deref(), Some("Overloaded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_has_no_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body("<html>nope</html>")
            .create_async()
            .await;

        let err = matcher(server.url(), 0).match_breed(&request()).await.unwrap_err();
        assert!(matches!(err, MatchError::Upstream { status: 401, message: None }));
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let _ = matcher(server.url(), 0).match_breed(&request()).await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_retries_server_errors_up_to_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .expect(3)
            .create_async()
            .await;

        let err = matcher(server.url(), 2).match_breed(&request()).await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, MatchError::Upstream { status: 529, .. }));
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(400)
            .expect(1)
            .create_async()
            .await;

        let _ = matcher(server.url(), 3).match_breed(&request()).await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_object_success_body_is_invalid() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body("[1, 2, 3]")
            .create_async()
            .await;

        let err = matcher(server.url(), 0).match_breed(&request()).await.unwrap_err();
        assert!(matches!(err, MatchError::InvalidResponse(_)));
    }
}
