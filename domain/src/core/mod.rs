//! Core domain concepts shared across all subdomains.
//!
//! - [`error::ConfigError`]: invalid mixture shape

pub mod error;
