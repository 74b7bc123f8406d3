//! Anthropic Messages API backend

use super::ResolvedBackend;
use super::http::send_json;
use async_trait::async_trait;
use moa_application::{Backend, BackendError, CallContext};
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-06-01";
/// The Messages API requires `max_tokens` on every request
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicBackend {
    client: reqwest::Client,
    target: ResolvedBackend,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl AnthropicBackend {
    pub fn new(client: reqwest::Client, target: ResolvedBackend) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl Backend for AnthropicBackend {
    fn name(&self) -> &str {
        &self.target.name
    }

    async fn generate(&self, ctx: &CallContext, prompt: &str) -> Result<String, BackendError> {
        let body = MessagesRequest {
            model: &self.target.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.target.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.target.temperature,
        };

        let mut request = self
            .client
            .post(self.target.url("v1/messages"))
            .header("anthropic-version", API_VERSION)
            .json(&body);
        if let Some(key) = &self.target.api_key {
            request = request.header("x-api-key", key);
        }

        let response: MessagesResponse = send_json(ctx, request, &self.target.model).await?;

        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(BackendError::InvalidResponse(
                "No text content in response".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::resolved;
    use mockito::Matcher;
    use serde_json::json;

    fn backend(server: &mockito::ServerGuard) -> AnthropicBackend {
        AnthropicBackend::new(
            reqwest::Client::new(),
            resolved(&server.url(), "claude-3-5-haiku-latest"),
        )
    }

    #[tokio::test]
    async fn test_generate_joins_text_blocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-test")
            .match_header("anthropic-version", API_VERSION)
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-3-5-haiku-latest",
                "max_tokens": DEFAULT_MAX_TOKENS,
                "messages": [{ "role": "user", "content": "hello" }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content":[{"type":"text","text":"Hello, "},{"type":"text","text":"world"}],"stop_reason":"end_turn"}"#,
            )
            .create_async()
            .await;

        let output = backend(&server)
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap();

        assert_eq!(output, "Hello, world");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_maps_auth_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body("invalid x-api-key")
            .create_async()
            .await;

        let err = backend(&server)
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BackendError::Authentication("invalid x-api-key".to_string())
        );
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let err = backend(&server)
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}
