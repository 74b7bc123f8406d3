//! Progress notification port
//!
//! Defines the interface for reporting progress during a mixture run.

use moa_domain::{AgentPosition, Stage};

/// Callback for progress updates during a mixture run
///
/// Implementations live in the presentation layer. All callbacks are invoked
/// from the coordinating task, never from inside an agent call.
pub trait MixtureProgress: Send + Sync {
    /// Called when an iteration starts (`iteration` is zero-based)
    fn on_iteration_start(&self, _iteration: usize, _total: usize) {}

    /// Called when a layer's fan-out starts
    fn on_layer_start(&self, stage: Stage, agents: usize);

    /// Called when an agent call finishes, in completion order
    fn on_agent_complete(&self, position: AgentPosition, agent: &str, success: bool);

    /// Called once every agent in the layer has finished
    fn on_layer_complete(&self, stage: Stage, success: bool);

    fn on_aggregation_start(&self, _aggregator: &str) {}

    fn on_aggregation_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl MixtureProgress for NoProgress {
    fn on_layer_start(&self, _stage: Stage, _agents: usize) {}
    fn on_agent_complete(&self, _position: AgentPosition, _agent: &str, _success: bool) {}
    fn on_layer_complete(&self, _stage: Stage, _success: bool) {}
}
