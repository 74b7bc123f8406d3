//! Backend factory for the HTTP providers
//!
//! Resolution order for each option is: the backend's own spec, then the
//! provider defaults from configuration, then the provider's built-in
//! default.
//!
//! Credentials may be given literally or as `env:VAR_NAME`.

use super::{AnthropicBackend, OllamaBackend, OpenAiBackend, ResolvedBackend};
use moa_application::{Backend, BackendBuildError, BackendFactory};
use moa_domain::{BackendSpec, ProviderKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const ENV_PREFIX: &str = "env:";

/// Reads an environment variable; swapped out in tests
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Per-provider defaults (the `[providers.<name>]` tables)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    /// Variable to read the key from instead of the provider's usual one
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Builds reqwest-backed backends, sharing one connection pool between them
pub struct ProviderBackendFactory {
    client: reqwest::Client,
    settings: HashMap<ProviderKind, ProviderSettings>,
    env: EnvLookup,
}

impl ProviderBackendFactory {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: HashMap::new(),
            env: Arc::new(|name: &str| std::env::var(name).ok()),
        }
    }

    pub fn with_settings(mut self, settings: HashMap<ProviderKind, ProviderSettings>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_env(mut self, env: EnvLookup) -> Self {
        self.env = env;
        self
    }

    /// Work out every connection option for `spec` without building a client
    pub fn resolve(&self, spec: &BackendSpec) -> Result<(ProviderKind, ResolvedBackend), BackendBuildError> {
        let kind = spec.provider_kind()?;
        let defaults = self.settings.get(&kind).cloned().unwrap_or_default();

        let model = spec.model.trim();
        if model.is_empty() {
            return Err(BackendBuildError::MissingModel {
                provider: kind.to_string(),
            });
        }

        let base_url = spec
            .base_url
            .clone()
            .or(defaults.base_url.clone())
            .or_else(|| kind.default_base_url().map(str::to_string))
            .ok_or_else(|| BackendBuildError::MissingBaseUrl {
                provider: kind.to_string(),
            })?;

        let api_key = self.resolve_api_key(kind, spec, &defaults)?;

        Ok((
            kind,
            ResolvedBackend {
                name: spec.to_string(),
                base_url,
                api_key,
                model: model.to_string(),
                max_tokens: spec.max_tokens.or(defaults.max_tokens),
                temperature: spec.temperature.or(defaults.temperature),
            },
        ))
    }

    fn resolve_api_key(
        &self,
        kind: ProviderKind,
        spec: &BackendSpec,
        defaults: &ProviderSettings,
    ) -> Result<Option<String>, BackendBuildError> {
        let missing = |env_var: &str| BackendBuildError::MissingCredential {
            provider: kind.to_string(),
            env_var: env_var.to_string(),
        };

        if let Some(key) = spec.api_key.as_ref().or(defaults.api_key.as_ref()) {
            return match key.strip_prefix(ENV_PREFIX) {
                Some(var) => self.lookup(var).map(Some).ok_or_else(|| missing(var)),
                None => Ok(Some(key.clone())),
            };
        }

        let env_var = defaults
            .api_key_env
            .as_deref()
            .or_else(|| kind.default_api_key_env());
        let key = env_var.and_then(|var| self.lookup(var));

        match (key, env_var) {
            (Some(key), _) => Ok(Some(key)),
            (None, Some(var)) if kind.requires_api_key() => Err(missing(var)),
            _ => Ok(None),
        }
    }

    fn lookup(&self, var: &str) -> Option<String> {
        (self.env)(var).filter(|value| !value.trim().is_empty())
    }
}

impl Default for ProviderBackendFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendFactory for ProviderBackendFactory {
    fn create(&self, spec: &BackendSpec) -> Result<Arc<dyn Backend>, BackendBuildError> {
        let (kind, target) = self.resolve(spec)?;
        debug!("Creating {} backend at {}", target.name, target.base_url);

        let client = self.client.clone();
        Ok(match kind {
            ProviderKind::OpenAi | ProviderKind::Groq | ProviderKind::OpenAiCompatible => {
                Arc::new(OpenAiBackend::new(client, target))
            }
            ProviderKind::Anthropic => Arc::new(AnthropicBackend::new(client, target)),
            ProviderKind::Ollama => Arc::new(OllamaBackend::new(client, target)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory_with(vars: &[(&str, &str)]) -> ProviderBackendFactory {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProviderBackendFactory::new().with_env(Arc::new(move |name: &str| vars.get(name).cloned()))
    }

    #[test]
    fn test_default_env_var_supplies_key() {
        let factory = factory_with(&[("OPENAI_API_KEY", "sk-env")]);
        let (kind, target) = factory.resolve(&BackendSpec::new("openai", "gpt-4o")).unwrap();

        assert_eq!(kind, ProviderKind::OpenAi);
        assert_eq!(target.api_key.as_deref(), Some("sk-env"));
        assert_eq!(target.base_url, "https://api.openai.com/v1");
        assert_eq!(target.name, "openai/gpt-4o");
    }

    #[test]
    fn test_env_reference_in_spec() {
        let factory = factory_with(&[("TEAM_GROQ_KEY", "gsk-team")]);
        let spec = BackendSpec::new("groq", "llama-3.1-70b").with_api_key("env:TEAM_GROQ_KEY");

        let (_, target) = factory.resolve(&spec).unwrap();
        assert_eq!(target.api_key.as_deref(), Some("gsk-team"));
    }

    #[test]
    fn test_unset_env_reference_names_the_variable() {
        let factory = factory_with(&[]);
        let spec = BackendSpec::new("anthropic", "claude").with_api_key("env:MISSING_KEY");

        match factory.create(&spec) {
            Err(BackendBuildError::MissingCredential { provider, env_var }) => {
                assert_eq!(provider, "anthropic");
                assert_eq!(env_var, "MISSING_KEY");
            }
            other => panic!("expected missing credential, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_hosted_provider_requires_key() {
        let factory = factory_with(&[]);
        let err = factory
            .create(&BackendSpec::new("anthropic", "claude"))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BackendBuildError::MissingCredential { ref env_var, .. } if env_var == "ANTHROPIC_API_KEY"
        ));
    }

    #[test]
    fn test_blank_env_value_counts_as_missing() {
        let factory = factory_with(&[("OPENAI_API_KEY", "  ")]);
        assert!(factory.create(&BackendSpec::new("openai", "gpt-4o")).is_err());
    }

    #[test]
    fn test_local_provider_needs_no_key() {
        let factory = factory_with(&[]);
        let (_, target) = factory.resolve(&BackendSpec::new("ollama", "llama3")).unwrap();

        assert_eq!(target.api_key, None);
        assert_eq!(target.base_url, "http://localhost:11434");
        assert!(factory.create(&BackendSpec::new("ollama", "llama3")).is_ok());
    }

    #[test]
    fn test_compatible_provider_requires_base_url() {
        let factory = factory_with(&[]);
        let err = factory
            .create(&BackendSpec::new("openai-compatible", "qwen"))
            .err()
            .unwrap();
        assert!(matches!(err, BackendBuildError::MissingBaseUrl { .. }));

        let spec = BackendSpec::new("openai-compatible", "qwen").with_base_url("http://vllm:8000/v1");
        assert!(factory.create(&spec).is_ok());
    }

    #[test]
    fn test_unknown_provider_and_empty_model() {
        let factory = factory_with(&[]);
        assert!(matches!(
            factory.create(&BackendSpec::new("bard", "x")).err().unwrap(),
            BackendBuildError::UnknownProvider(_)
        ));
        assert!(matches!(
            factory.create(&BackendSpec::new("ollama", "  ")).err().unwrap(),
            BackendBuildError::MissingModel { .. }
        ));
    }

    #[test]
    fn test_provider_settings_fill_gaps() {
        let settings = HashMap::from([(
            ProviderKind::OpenAi,
            ProviderSettings {
                api_key_env: Some("AZURE_KEY".to_string()),
                base_url: Some("https://azure.example.com/openai".to_string()),
                max_tokens: Some(512),
                temperature: Some(0.7),
                ..Default::default()
            },
        )]);
        let factory = factory_with(&[("AZURE_KEY", "az-123")]).with_settings(settings);

        let spec = BackendSpec::new("openai", "gpt-4o").with_temperature(0.1);
        let (_, target) = factory.resolve(&spec).unwrap();

        assert_eq!(target.api_key.as_deref(), Some("az-123"));
        assert_eq!(target.base_url, "https://azure.example.com/openai");
        assert_eq!(target.max_tokens, Some(512));
        assert_eq!(target.temperature, Some(0.1));
    }

    #[test]
    fn test_spec_key_wins_over_settings() {
        let settings = HashMap::from([(
            ProviderKind::Anthropic,
            ProviderSettings {
                api_key: Some("from-config".to_string()),
                ..Default::default()
            },
        )]);
        let factory = factory_with(&[]).with_settings(settings);

        let (_, target) = factory
            .resolve(&BackendSpec::new("anthropic", "claude").with_api_key("literal"))
            .unwrap();
        assert_eq!(target.api_key.as_deref(), Some("literal"));

        let (_, target) = factory.resolve(&BackendSpec::new("anthropic", "claude")).unwrap();
        assert_eq!(target.api_key.as_deref(), Some("from-config"));
    }
}
