//! Structured issues found while checking a mixture configuration file.
//!
//! Shape problems that make the orchestrator unbuildable are reported as
//! [`ConfigError`](crate::ConfigError) at construction time. The issues here
//! are the softer, file-level findings a front end can show before building.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No `[[layers]]` were configured.
    NoLayers,
    /// A layer has no agents.
    EmptyLayer { layer: usize },
    /// An agent or the aggregator names a provider that does not exist.
    UnknownProvider { location: String, provider: String },
    /// An agent or the aggregator has an empty model identifier.
    EmptyModel { location: String },
    /// A `provider/model` shorthand could not be split.
    InvalidAgent { location: String, value: String },
    /// No `[aggregator]` was configured.
    MissingAggregator,
    /// `max_parallel` is at least as wide as every layer, so it never limits anything.
    IneffectiveParallelCap { max_parallel: usize, widest_layer: usize },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// True if any issue in the list is fatal
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_detects_error_severity() {
        let issues = vec![
            ConfigIssue::warning(
                ConfigIssueCode::IneffectiveParallelCap {
                    max_parallel: 8,
                    widest_layer: 3,
                },
                "max_parallel has no effect",
            ),
            ConfigIssue::error(ConfigIssueCode::NoLayers, "no layers"),
        ];
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_false_for_warnings_only() {
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::IneffectiveParallelCap {
                max_parallel: 4,
                widest_layer: 2,
            },
            "max_parallel has no effect",
        )];
        assert!(!ConfigIssue::has_errors(&issues));
        assert!(!ConfigIssue::has_errors(&[]));
    }
}
