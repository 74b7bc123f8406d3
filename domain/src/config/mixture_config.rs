//! Mixture configuration value object.
//!
//! [`MixtureConfig`] captures how a mixture runs: how many independent
//! iterations, how many agents may be in flight at once, and how long a
//! single agent call may take. It is immutable once the orchestrator is built.

use crate::core::error::ConfigError;
use std::time::Duration;

/// Optional shape contract for the layer matrix.
///
/// When a dimension is declared, the provided layer definitions must
/// match it exactly. Undeclared dimensions accept any non-empty shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerShape {
    /// Number of layers the matrix must have
    pub layers: Option<usize>,
    /// Number of agents every layer must have
    pub agents_per_layer: Option<usize>,
}

impl LayerShape {
    pub fn new(layers: usize, agents_per_layer: usize) -> Self {
        Self {
            layers: Some(layers),
            agents_per_layer: Some(agents_per_layer),
        }
    }
}

/// Runtime settings for a Mixture of Agents.
///
/// # Example
///
/// ```
/// use moa_domain::MixtureConfig;
/// use std::time::Duration;
///
/// let config = MixtureConfig::new(2)
///     .with_max_parallel(4)
///     .with_agent_timeout(Duration::from_secs(30));
///
/// assert_eq!(config.parallel_limit(), Some(4));
/// assert_eq!(config.call_timeout(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixtureConfig {
    /// Number of independent passes through all layers (at least 1).
    pub iterations: usize,
    /// Maximum agents in flight per layer. `0` means no cap.
    pub max_parallel: usize,
    /// Deadline for a single agent call. `Duration::ZERO` means none.
    pub agent_timeout: Duration,
    /// Declared layer/agent counts, if any.
    pub shape: LayerShape,
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            max_parallel: 0,
            agent_timeout: Duration::ZERO,
            shape: LayerShape::default(),
        }
    }
}

impl MixtureConfig {
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ..Default::default()
        }
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_shape(mut self, shape: LayerShape) -> Self {
        self.shape = shape;
        self
    }

    /// Concurrency cap, or `None` when every agent may run at once
    pub fn parallel_limit(&self) -> Option<usize> {
        (self.max_parallel > 0).then_some(self.max_parallel)
    }

    /// Per-call deadline, or `None` when calls are only bound by the caller
    pub fn call_timeout(&self) -> Option<Duration> {
        (!self.agent_timeout.is_zero()).then_some(self.agent_timeout)
    }

    /// Check the configuration against the agent counts of each layer.
    ///
    /// `agent_counts[i]` is the number of agents in layer `i`. Errors are
    /// reported in a fixed order: iterations, missing layers, declared layer
    /// count, then the first offending layer.
    pub fn validate(&self, agent_counts: &[usize]) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if agent_counts.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        if let Some(declared) = self.shape.layers
            && declared != agent_counts.len()
        {
            return Err(ConfigError::LayerCountMismatch {
                declared,
                actual: agent_counts.len(),
            });
        }

        for (layer, &count) in agent_counts.iter().enumerate() {
            if count == 0 {
                return Err(ConfigError::EmptyLayer { layer });
            }
            if let Some(declared) = self.shape.agents_per_layer
                && declared != count
            {
                return Err(ConfigError::AgentCountMismatch {
                    layer,
                    declared,
                    actual: count,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = MixtureConfig::default();
        assert_eq!(config.iterations, 1);
        assert_eq!(config.parallel_limit(), None);
        assert_eq!(config.call_timeout(), None);
        assert_eq!(config.shape, LayerShape::default());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = MixtureConfig::new(0);
        assert_eq!(config.validate(&[1]), Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn test_no_layers_rejected() {
        assert_eq!(
            MixtureConfig::default().validate(&[]),
            Err(ConfigError::NoLayers)
        );
    }

    #[test]
    fn test_empty_layer_rejected() {
        assert_eq!(
            MixtureConfig::default().validate(&[2, 0, 1]),
            Err(ConfigError::EmptyLayer { layer: 1 })
        );
    }

    #[test]
    fn test_declared_shape_must_match() {
        let config = MixtureConfig::new(2).with_shape(LayerShape::new(2, 3));

        assert!(config.validate(&[3, 3]).is_ok());
        assert_eq!(
            config.validate(&[3]),
            Err(ConfigError::LayerCountMismatch {
                declared: 2,
                actual: 1
            })
        );
        assert_eq!(
            config.validate(&[3, 2]),
            Err(ConfigError::AgentCountMismatch {
                layer: 1,
                declared: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_partial_shape() {
        let config = MixtureConfig::default().with_shape(LayerShape {
            layers: Some(2),
            agents_per_layer: None,
        });
        assert!(config.validate(&[1, 4]).is_ok());
    }

    #[test]
    fn test_empty_layer_reported_before_count_mismatch() {
        let config = MixtureConfig::default().with_shape(LayerShape::new(1, 2));
        assert_eq!(
            config.validate(&[0]),
            Err(ConfigError::EmptyLayer { layer: 0 })
        );
    }
}
