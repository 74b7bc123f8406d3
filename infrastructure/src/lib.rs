//! Infrastructure layer for mixture-of-agents
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentEntry, FileConfig, FileLayerConfig,
    FileMixtureConfig, FileOutputConfig, MixturePlan,
};
pub use providers::{
    AnthropicBackend, OllamaBackend, OpenAiBackend, ProviderBackendFactory, ProviderSettings,
};
