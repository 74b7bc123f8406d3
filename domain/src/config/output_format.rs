//! Output format value object

use serde::{Deserialize, Serialize};

/// How the final response is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain response text (default)
    #[default]
    Text,
    /// Response with a header describing the mixture
    Full,
    /// JSON object with prompt, response and mixture shape
    Json,
}
