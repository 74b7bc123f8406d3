//! Output formatter trait and the report it renders

use serde::Serialize;

/// What a finished run looks like to the user
#[derive(Debug, Clone, Serialize)]
pub struct MixtureReport {
    pub prompt: String,
    pub response: String,
    pub iterations: usize,
    /// Agent names per layer, in execution order
    pub layers: Vec<Vec<String>>,
    pub aggregator: String,
    pub elapsed_ms: u128,
}

/// Trait for formatting mixture results
pub trait OutputFormatter {
    /// Format the response with the mixture layout
    fn format(&self, report: &MixtureReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &MixtureReport) -> String;

    /// Format the response only
    fn format_response_only(&self, report: &MixtureReport) -> String;
}
