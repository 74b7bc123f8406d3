//! Ollama generate API backend for local models

use super::ResolvedBackend;
use super::http::send_json;
use async_trait::async_trait;
use moa_application::{Backend, BackendError, CallContext};
use serde::{Deserialize, Serialize};

pub struct OllamaBackend {
    client: reqwest::Client,
    target: ResolvedBackend,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "GenerateOptions::is_empty")]
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl GenerateOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.num_predict.is_none()
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaBackend {
    pub fn new(client: reqwest::Client, target: ResolvedBackend) -> Self {
        Self { client, target }
    }
}

#[async_trait]
impl Backend for OllamaBackend {
    fn name(&self) -> &str {
        &self.target.name
    }

    async fn generate(&self, ctx: &CallContext, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateRequest {
            model: &self.target.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.target.temperature,
                num_predict: self.target.max_tokens,
            },
        };

        let mut request = self.client.post(self.target.url("api/generate")).json(&body);
        if let Some(key) = &self.target.api_key {
            request = request.bearer_auth(key);
        }

        let response: GenerateResponse = send_json(ctx, request, &self.target.model).await?;
        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::resolved;
    use mockito::Matcher;
    use serde_json::json;

    fn backend(server: &mockito::ServerGuard, max_tokens: Option<u32>) -> OllamaBackend {
        let mut target = resolved(&server.url(), "llama3");
        target.api_key = None;
        target.max_tokens = max_tokens;
        OllamaBackend::new(reqwest::Client::new(), target)
    }

    #[tokio::test]
    async fn test_generate_disables_streaming() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama3",
                "prompt": "hello",
                "stream": false,
                "options": { "num_predict": 256 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"llama3","response":"local answer","done":true}"#)
            .create_async()
            .await;

        let output = backend(&server, Some(256))
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap();

        assert_eq!(output, "local answer");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_model_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body(r#"{"error":"model 'llama3' not found"}"#)
            .create_async()
            .await;

        let err = backend(&server, None)
            .generate(&CallContext::new(), "hello")
            .await
            .unwrap_err();

        assert_eq!(err, BackendError::ModelNotFound("llama3".to_string()));
    }

    #[test]
    fn test_empty_options_are_omitted() {
        let body = GenerateRequest {
            model: "llama3",
            prompt: "p",
            stream: false,
            options: GenerateOptions {
                temperature: None,
                num_predict: None,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("options").is_none());
    }
}
