//! Provider identifiers and backend construction options (serde-free).
//!
//! A [`BackendSpec`] is the set of named options handed to a backend
//! factory. It says nothing about how the backend is built; that is the
//! factory's concern.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Provider identifier that could not be recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown provider: {0}")]
pub struct UnknownProvider(pub String);

/// Generative backends the factory knows how to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Groq,
    Ollama,
    /// Any endpoint speaking the OpenAI chat completions protocol
    OpenAiCompatible,
}

impl ProviderKind {
    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::OpenAi,
            ProviderKind::Anthropic,
            ProviderKind::Groq,
            ProviderKind::Ollama,
            ProviderKind::OpenAiCompatible,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Groq => "groq",
            ProviderKind::Ollama => "ollama",
            ProviderKind::OpenAiCompatible => "openai-compatible",
        }
    }

    /// Environment variable consulted when no explicit key is given
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Groq => Some("GROQ_API_KEY"),
            ProviderKind::Ollama | ProviderKind::OpenAiCompatible => None,
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("https://api.openai.com/v1"),
            ProviderKind::Anthropic => Some("https://api.anthropic.com"),
            ProviderKind::Groq => Some("https://api.groq.com/openai/v1"),
            ProviderKind::Ollama => Some("http://localhost:11434"),
            ProviderKind::OpenAiCompatible => None,
        }
    }

    /// Hosted providers refuse requests without a credential
    pub fn requires_api_key(&self) -> bool {
        matches!(
            self,
            ProviderKind::OpenAi | ProviderKind::Anthropic | ProviderKind::Groq
        )
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "groq" => Ok(ProviderKind::Groq),
            "ollama" => Ok(ProviderKind::Ollama),
            "openai-compatible" | "openai_compatible" => Ok(ProviderKind::OpenAiCompatible),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// Named options for constructing one backend.
///
/// # Example
///
/// ```
/// use moa_domain::BackendSpec;
///
/// let spec = BackendSpec::new("anthropic", "claude-3-5-sonnet-20240620")
///     .with_api_key("env:ANTHROPIC_API_KEY")
///     .with_max_tokens(1024);
///
/// assert_eq!(spec.to_string(), "anthropic/claude-3-5-sonnet-20240620");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendSpec {
    /// Provider identifier, e.g. "openai" or "ollama"
    pub provider: String,
    /// Model identifier understood by the provider
    pub model: String,
    /// Credential, either literal or `env:VAR_NAME`
    pub api_key: Option<String>,
    /// Endpoint override
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl BackendSpec {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn provider_kind(&self) -> Result<ProviderKind, UnknownProvider> {
        self.provider.parse()
    }
}

impl fmt::Display for BackendSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_roundtrip() {
        for kind in ProviderKind::all() {
            let parsed: ProviderKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_provider_aliases_and_case() {
        assert_eq!("Claude".parse(), Ok(ProviderKind::Anthropic));
        assert_eq!(" OpenAI ".parse(), Ok(ProviderKind::OpenAi));
        assert_eq!(
            "openai_compatible".parse(),
            Ok(ProviderKind::OpenAiCompatible)
        );
    }

    #[test]
    fn test_unknown_provider() {
        let err = "bard".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err, UnknownProvider("bard".to_string()));
        assert_eq!(err.to_string(), "Unknown provider: bard");
    }

    #[test]
    fn test_credential_requirements() {
        assert!(ProviderKind::Groq.requires_api_key());
        assert!(!ProviderKind::Ollama.requires_api_key());
        assert_eq!(ProviderKind::Ollama.default_api_key_env(), None);
        assert_eq!(ProviderKind::OpenAiCompatible.default_base_url(), None);
    }

    #[test]
    fn test_spec_builder() {
        let spec = BackendSpec::new("ollama", "llama3")
            .with_base_url("http://gpu-box:11434")
            .with_temperature(0.2);
        assert_eq!(spec.provider_kind(), Ok(ProviderKind::Ollama));
        assert_eq!(spec.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(spec.temperature, Some(0.2));
        assert!(spec.api_key.is_none());
    }
}
