//! Types for the mixture use case: layers and the error taxonomy.

use crate::ports::backend::{Backend, BackendError};
use crate::ports::backend_factory::BackendBuildError;
use moa_domain::{AgentPosition, ConfigError};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Which backend a construction error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendRole {
    Agent { layer: usize, agent: usize },
    Aggregator,
}

impl fmt::Display for BackendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendRole::Agent { layer, agent } => write!(f, "layer {} agent {}", layer, agent),
            BackendRole::Aggregator => write!(f, "aggregator"),
        }
    }
}

/// Errors that can occur while building or running a mixture
#[derive(Error, Debug)]
pub enum MixtureError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Failed to construct {role} ({spec}): {source}")]
    BackendConstruction {
        role: BackendRole,
        spec: String,
        #[source]
        source: BackendBuildError,
    },

    #[error("Layer failed at {position} ({agent}): {source}")]
    Layer {
        position: AgentPosition,
        agent: String,
        #[source]
        source: BackendError,
    },

    #[error("Aggregation failed ({aggregator}): {source}")]
    Aggregation {
        aggregator: String,
        #[source]
        source: BackendError,
    },
}

impl MixtureError {
    /// The backend failure behind a layer or aggregation error
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            MixtureError::Layer { source, .. } | MixtureError::Aggregation { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// Check if the run was stopped by caller cancellation
    pub fn is_cancelled(&self) -> bool {
        self.backend_error().is_some_and(BackendError::is_cancelled)
    }

    /// Check if the run was stopped by a per-call or caller deadline
    pub fn is_timeout(&self) -> bool {
        self.backend_error().is_some_and(BackendError::is_timeout)
    }
}

/// Agents that receive the same input and run concurrently.
///
/// Agent order is fixed at construction and determines the order in which
/// outputs are combined.
#[derive(Clone)]
pub struct Layer {
    agents: Vec<Arc<dyn Backend>>,
}

impl Layer {
    pub fn new(agents: Vec<Arc<dyn Backend>>) -> Self {
        Self { agents }
    }

    pub fn agents(&self) -> &[Arc<dyn Backend>] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("agents", &self.agent_names())
            .finish()
    }
}
