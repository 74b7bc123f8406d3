//! Configuration file loading for mixture-of-agents
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MOA_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./moa.toml` or `./.moa.toml`
//! 4. Global: `$XDG_CONFIG_HOME/mixture-of-agents/moa.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentEntry, FileAgentSpec, FileConfig, FileLayerConfig,
    FileMixtureConfig, FileOutputConfig, FileProviderConfig, FileProvidersConfig, MixturePlan,
};
pub use loader::ConfigLoader;
