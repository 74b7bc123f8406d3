//! Domain layer for mixture-of-agents
//!
//! This crate contains the configuration, value objects and pure functions
//! of the mixture. It has no dependencies on runtime, transport or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Layer**: agents that receive the same input and run concurrently
//! - **Iteration**: one pass of the prompt through every layer in order
//! - **Combiner**: order-preserving merge of agent or iteration outputs
//! - **Aggregator**: the agent that synthesises all iteration outputs

pub mod config;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod providers;

// Re-export commonly used types
pub use config::{
    LayerShape, MixtureConfig, OutputFormat,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use core::error::ConfigError;
pub use orchestration::{
    combiner::{RESULT_SEPARATOR, combine_results},
    stage::{AgentPosition, Stage},
};
pub use prompt::PromptTemplate;
pub use providers::{BackendSpec, ProviderKind, UnknownProvider};
