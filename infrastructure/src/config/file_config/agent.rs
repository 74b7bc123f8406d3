//! Agent entries (`[[layers]].agents` items and `[aggregator]`)

use moa_domain::{BackendSpec, ConfigIssue, ConfigIssueCode, ProviderKind};
use serde::{Deserialize, Serialize};

/// One backend, either as `"provider/model"` or as a full table
///
/// # Example
///
/// ```toml
/// [[layers]]
/// agents = [
///     "openai/gpt-4o-mini",
///     { provider = "anthropic", model = "claude-3-5-haiku-latest", temperature = 0.3 },
/// ]
///
/// [aggregator]
/// provider = "openai"
/// model = "gpt-4o"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileAgentEntry {
    Short(String),
    Full(FileAgentSpec),
}

/// Table form of an agent entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileAgentSpec {
    pub provider: String,
    pub model: String,
    /// Literal key or `env:VAR_NAME`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl FileAgentEntry {
    /// Convert into a backend spec, reporting problems against `location`.
    ///
    /// Returns `None` only when the entry cannot be interpreted at all.
    pub fn parse(&self, location: &str) -> (Option<BackendSpec>, Vec<ConfigIssue>) {
        let spec = match self {
            FileAgentEntry::Short(value) => match value.split_once('/') {
                Some((provider, model)) => BackendSpec::new(provider.trim(), model.trim()),
                None => {
                    let issue = ConfigIssue::error(
                        ConfigIssueCode::InvalidAgent {
                            location: location.to_string(),
                            value: value.clone(),
                        },
                        format!("{}: expected \"provider/model\", got '{}'", location, value),
                    );
                    return (None, vec![issue]);
                }
            },
            FileAgentEntry::Full(full) => BackendSpec {
                provider: full.provider.clone(),
                model: full.model.clone(),
                api_key: full.api_key.clone(),
                base_url: full.base_url.clone(),
                max_tokens: full.max_tokens,
                temperature: full.temperature,
            },
        };

        let mut issues = Vec::new();
        if spec.provider_kind().is_err() {
            let known: Vec<&str> = ProviderKind::all().iter().map(|k| k.as_str()).collect();
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownProvider {
                    location: location.to_string(),
                    provider: spec.provider.clone(),
                },
                format!(
                    "{}: unknown provider '{}' (expected one of: {})",
                    location,
                    spec.provider,
                    known.join(", ")
                ),
            ));
        }
        if spec.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModel {
                    location: location.to_string(),
                },
                format!("{}: model must not be empty", location),
            ));
        }

        (Some(spec), issues)
    }
}
