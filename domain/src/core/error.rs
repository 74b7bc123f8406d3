//! Domain error types

use thiserror::Error;

/// Invalid mixture shape, detected before any backend is constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Iteration count must be at least 1")]
    ZeroIterations,

    #[error("At least one layer must be specified")]
    NoLayers,

    #[error("Layer {layer} has no agents")]
    EmptyLayer { layer: usize },

    #[error("Declared {declared} layers but {actual} were provided")]
    LayerCountMismatch { declared: usize, actual: usize },

    #[error("Declared {declared} agents per layer but layer {layer} has {actual}")]
    AgentCountMismatch {
        layer: usize,
        declared: usize,
        actual: usize,
    },
}

impl ConfigError {
    /// Index of the offending layer, if the error is about a single layer
    pub fn layer(&self) -> Option<usize> {
        match self {
            ConfigError::EmptyLayer { layer } | ConfigError::AgentCountMismatch { layer, .. } => {
                Some(*layer)
            }
            _ => None,
        }
    }
}
