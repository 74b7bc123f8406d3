//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agent;
mod mixture;
mod output;
mod providers;

pub use agent::{FileAgentEntry, FileAgentSpec};
pub use mixture::FileMixtureConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig};

use moa_domain::{BackendSpec, ConfigIssue, ConfigIssueCode, MixtureConfig, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `[[layers]]` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLayerConfig {
    pub agents: Vec<FileAgentEntry>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Iterations, concurrency and timeouts
    pub mixture: FileMixtureConfig,
    /// Layers in execution order
    pub layers: Vec<FileLayerConfig>,
    /// Backend that synthesises the final answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<FileAgentEntry>,
    /// Per-provider defaults
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

/// Everything needed to build the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct MixturePlan {
    pub config: MixtureConfig,
    pub layers: Vec<Vec<BackendSpec>>,
    pub aggregator: BackendSpec,
}

/// The configuration has at least one fatal issue
#[derive(Debug)]
pub struct ConfigValidationError {
    pub issues: Vec<ConfigIssue>,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.as_str())
            .collect();
        write!(f, "Invalid configuration: {}", messages.join("; "))
    }
}

impl std::error::Error for ConfigValidationError {}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.parse().1
    }

    /// Convert into domain types, failing if any issue is an error.
    ///
    /// Shape checks against a declared `layers`/`models_per_layer` are left
    /// to orchestrator construction.
    pub fn to_mixture(&self) -> Result<MixturePlan, ConfigValidationError> {
        let (plan, issues) = self.parse();
        match plan {
            Some(plan) if !ConfigIssue::has_errors(&issues) => Ok(plan),
            _ => Err(ConfigValidationError { issues }),
        }
    }

    fn parse(&self) -> (Option<MixturePlan>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        // 1. Layer matrix
        if self.layers.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoLayers,
                "no [[layers]] configured",
            ));
        }

        let mut layers = Vec::with_capacity(self.layers.len());
        for (l, layer) in self.layers.iter().enumerate() {
            if layer.agents.is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyLayer { layer: l },
                    format!("layers[{}]: no agents configured", l),
                ));
            }
            let mut specs = Vec::with_capacity(layer.agents.len());
            for (a, entry) in layer.agents.iter().enumerate() {
                let (spec, found) = entry.parse(&format!("layers[{}].agents[{}]", l, a));
                issues.extend(found);
                specs.extend(spec);
            }
            layers.push(specs);
        }

        // 2. Aggregator
        let aggregator = match &self.aggregator {
            Some(entry) => {
                let (spec, found) = entry.parse("aggregator");
                issues.extend(found);
                spec
            }
            None => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingAggregator,
                    "no [aggregator] configured",
                ));
                None
            }
        };

        // 3. Concurrency cap that can never bind
        let widest_layer = self.layers.iter().map(|l| l.agents.len()).max().unwrap_or(0);
        let max_parallel = self.mixture.max_parallel;
        if max_parallel > 0 && widest_layer > 0 && max_parallel >= widest_layer {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::IneffectiveParallelCap {
                    max_parallel,
                    widest_layer,
                },
                format!(
                    "mixture.max_parallel = {} never limits anything (widest layer has {} agents)",
                    max_parallel, widest_layer
                ),
            ));
        }

        let plan = aggregator.map(|aggregator| MixturePlan {
            config: self.mixture.to_config(),
            layers,
            aggregator,
        });
        (plan, issues)
    }
}
