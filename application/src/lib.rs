//! Application layer for mixture-of-agents
//!
//! This crate contains the mixture orchestrator, the call context and the
//! port definitions. It depends only on the domain layer.

pub mod context;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use context::{CallContext, DoneReason};
pub use ports::{
    backend::{Backend, BackendError},
    backend_factory::{BackendBuildError, BackendFactory},
    progress::{MixtureProgress, NoProgress},
};
pub use use_cases::run_mixture::{BackendRole, Layer, MixtureError, MixtureOfAgents};
