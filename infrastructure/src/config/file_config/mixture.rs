//! Mixture settings from TOML (`[mixture]` section)

use moa_domain::{LayerShape, MixtureConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw mixture settings
///
/// # Example
///
/// ```toml
/// [mixture]
/// iterations = 2
/// max_parallel = 4          # 0 = unlimited
/// agent_timeout_secs = 90   # 0 = no per-call timeout
/// layers = 2                # optional: declared shape the [[layers]] must match
/// models_per_layer = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMixtureConfig {
    pub iterations: usize,
    pub max_parallel: usize,
    pub agent_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models_per_layer: Option<usize>,
}

impl Default for FileMixtureConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            max_parallel: 0,
            agent_timeout_secs: 0,
            layers: None,
            models_per_layer: None,
        }
    }
}

impl FileMixtureConfig {
    pub fn to_config(&self) -> MixtureConfig {
        MixtureConfig::new(self.iterations)
            .with_max_parallel(self.max_parallel)
            .with_agent_timeout(Duration::from_secs(self.agent_timeout_secs))
            .with_shape(LayerShape {
                layers: self.layers,
                agents_per_layer: self.models_per_layer,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unbounded_single_pass() {
        let config = FileMixtureConfig::default().to_config();
        assert_eq!(config.iterations, 1);
        assert_eq!(config.parallel_limit(), None);
        assert_eq!(config.call_timeout(), None);
        assert_eq!(config.shape, LayerShape::default());
    }

    #[test]
    fn test_mixture_deserialize() {
        let toml_str = r#"
[mixture]
iterations = 2
max_parallel = 3
agent_timeout_secs = 45
layers = 2
"#;
        let file: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let config = file.mixture.to_config();

        assert_eq!(config.iterations, 2);
        assert_eq!(config.parallel_limit(), Some(3));
        assert_eq!(config.call_timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.shape.layers, Some(2));
        assert_eq!(config.shape.agents_per_layer, None);
    }
}
