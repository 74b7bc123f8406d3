//! Provider defaults from TOML (`[providers]` section)

use crate::providers::ProviderSettings;
use moa_domain::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Defaults applied to every agent of one provider
///
/// # Example
///
/// ```toml
/// [providers.openai]
/// api_key_env = "OPENAI_API_KEY"
/// max_tokens = 1024
///
/// [providers.openai-compatible]
/// base_url = "http://localhost:8000/v1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable name for the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Direct API key (prefer `api_key_env`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileProviderConfig,
    pub anthropic: FileProviderConfig,
    pub groq: FileProviderConfig,
    pub ollama: FileProviderConfig,
    #[serde(rename = "openai-compatible", alias = "openai_compatible")]
    pub openai_compatible: FileProviderConfig,
}

impl FileProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> &FileProviderConfig {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Groq => &self.groq,
            ProviderKind::Ollama => &self.ollama,
            ProviderKind::OpenAiCompatible => &self.openai_compatible,
        }
    }

    /// Settings for every provider that has at least one value configured
    pub fn to_settings(&self) -> HashMap<ProviderKind, ProviderSettings> {
        ProviderKind::all()
            .iter()
            .filter(|kind| *self.get(**kind) != FileProviderConfig::default())
            .map(|kind| {
                let file = self.get(*kind);
                (
                    *kind,
                    ProviderSettings {
                        api_key: file.api_key.clone(),
                        api_key_env: file.api_key_env.clone(),
                        base_url: file.base_url.clone(),
                        max_tokens: file.max_tokens,
                        temperature: file.temperature,
                    },
                )
            })
            .collect()
    }
}
