//! Port definitions (interfaces for external collaborators)
//!
//! Ports define the boundary between the orchestrator and the outside
//! world. Adapters in the infrastructure and presentation layers implement
//! them.

pub mod backend;
pub mod backend_factory;
pub mod progress;
