//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod mixture_config;
mod output_format;
pub mod validation;

pub use mixture_config::{LayerShape, MixtureConfig};
pub use output_format::OutputFormat;
