//! Provider backends
//!
//! HTTP adapters implementing the [`Backend`](moa_application::Backend) port
//! for hosted and local model providers, plus the factory that resolves a
//! [`BackendSpec`](moa_domain::BackendSpec) into one of them.

mod anthropic;
mod factory;
mod http;
mod ollama;
mod openai;

pub use anthropic::AnthropicBackend;
pub use factory::{EnvLookup, ProviderBackendFactory, ProviderSettings};
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

/// Fully resolved connection options for one backend
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBackend {
    /// Display label, e.g. "openai/gpt-4o"
    pub name: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ResolvedBackend {
    /// Join `path` onto the base URL without doubling slashes
    pub(crate) fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
pub(crate) fn resolved(base_url: &str, model: &str) -> ResolvedBackend {
    ResolvedBackend {
        name: format!("test/{}", model),
        base_url: base_url.to_string(),
        api_key: Some("sk-test".to_string()),
        model: model.to_string(),
        max_tokens: None,
        temperature: None,
    }
}
