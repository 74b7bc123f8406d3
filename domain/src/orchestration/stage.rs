//! Where in a mixture run something happened.

use std::fmt;

/// A step of the mixture pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Fan-out of one layer within one iteration
    Layer { iteration: usize, layer: usize },
    /// Final synthesis by the aggregator
    Aggregation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Layer { iteration, layer } => {
                write!(f, "iteration {} layer {}", iteration, layer)
            }
            Stage::Aggregation => write!(f, "aggregation"),
        }
    }
}

/// Position of a single agent call (all indices zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentPosition {
    pub iteration: usize,
    pub layer: usize,
    pub agent: usize,
}

impl AgentPosition {
    pub fn new(iteration: usize, layer: usize, agent: usize) -> Self {
        Self {
            iteration,
            layer,
            agent,
        }
    }

    pub fn stage(&self) -> Stage {
        Stage::Layer {
            iteration: self.iteration,
            layer: self.layer,
        }
    }
}

impl fmt::Display for AgentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iteration {} layer {} agent {}",
            self.iteration, self.layer, self.agent
        )
    }
}
