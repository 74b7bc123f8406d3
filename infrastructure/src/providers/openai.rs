//! OpenAI chat completions backend
//!
//! Also serves Groq and any other endpoint that speaks the same protocol
//! (vLLM, LM Studio, llama.cpp server, ...).

use super::ResolvedBackend;
use super::http::send_json;
use async_trait::async_trait;
use moa_application::{Backend, BackendError, CallContext};
use serde::{Deserialize, Serialize};

pub struct OpenAiBackend {
    client: reqwest::Client,
    target: ResolvedBackend,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, target: ResolvedBackend) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
    fn name(&self) -> &str {
        &self.target.name
    }

    async fn generate(&self, ctx: &CallContext, prompt: &str) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: &self.target.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.target.max_tokens,
            temperature: self.target.temperature,
        };

        let mut request = self
            .client
            .post(self.target.url("chat/completions"))
            .json(&body);
        if let Some(key) = &self.target.api_key {
            request = request.bearer_auth(key);
        }

        let response: ChatResponse = send_json(ctx, request, &self.target.model).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::InvalidResponse("No content in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::resolved;
    use mockito::Matcher;
    use serde_json::json;

    fn backend(server: &mockito::ServerGuard) -> OpenAiBackend {
        let mut target = resolved(&server.url(), "gpt-4o-mini");
        target.temperature = Some(0.5);
        OpenAiBackend::new(reqwest::Client::new(), target)
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "user", "content": "hello" }],
                "temperature": 0.5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"hi there"}}]}"#)
            .create_async()
            .await;

        let output = backend(&server)
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap();

        assert_eq!(output, "hi there");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_maps_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create_async()
            .await;

        let err = backend(&server)
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::RateLimited);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = backend(&server)
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_cancelled_context_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let ctx = CallContext::new();
        ctx.cancel();
        let err = backend(&server).generate(&ctx, "hello").await.unwrap_err();

        assert_eq!(err, BackendError::Cancelled);
        mock.assert_async().await;
    }
}
