//! Backend factory port
//!
//! Turns a [`BackendSpec`] into a ready-to-call [`Backend`].

use crate::ports::backend::Backend;
use moa_domain::{BackendSpec, UnknownProvider};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while constructing a backend
#[derive(Error, Debug)]
pub enum BackendBuildError {
    #[error(transparent)]
    UnknownProvider(#[from] UnknownProvider),

    #[error("No model specified for provider {provider}")]
    MissingModel { provider: String },

    #[error("Missing credential for provider {provider} (set {env_var})")]
    MissingCredential { provider: String, env_var: String },

    #[error("No base URL configured for provider {provider}")]
    MissingBaseUrl { provider: String },

    #[error("Failed to create client: {0}")]
    Client(String),
}

/// Builds backends from named construction options.
///
/// Construction is synchronous and eager: credentials and endpoints are
/// resolved here so a misconfigured backend fails before any prompt is sent.
pub trait BackendFactory: Send + Sync {
    fn create(&self, spec: &BackendSpec) -> Result<Arc<dyn Backend>, BackendBuildError>;
}
