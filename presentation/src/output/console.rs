//! Console output formatter for mixture results

use crate::output::formatter::{MixtureReport, OutputFormatter};
use colored::Colorize;
use moa_domain::OutputFormat;

/// Formats mixture results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `report` in the requested format
    pub fn render(report: &MixtureReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self.format_response_only(report),
            OutputFormat::Full => Self.format(report),
            OutputFormat::Json => Self.format_json(report),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{}\n{}\n", line.cyan(), title.cyan().bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n", format!("── {} ──", title).yellow().bold())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &MixtureReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Mixture of Agents"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Prompt:".cyan().bold(), report.prompt));
        output.push_str(&format!(
            "{} {}\n",
            "Iterations:".cyan().bold(),
            report.iterations
        ));

        output.push_str(&Self::section_header("Layers"));
        for (index, agents) in report.layers.iter().enumerate() {
            output.push_str(&format!("  {} {}\n", format!("{}.", index + 1).bold(), agents.join(", ")));
        }
        output.push_str(&format!(
            "  {} {}\n",
            "Aggregator:".bold(),
            report.aggregator
        ));

        output.push_str(&Self::section_header("Response"));
        output.push_str(&format!("\n{}\n", report.response));

        output.push_str(&format!(
            "\n{}\n",
            format!("Completed in {:.1}s", report.elapsed_ms as f64 / 1000.0).dimmed()
        ));

        output
    }

    fn format_json(&self, report: &MixtureReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_response_only(&self, report: &MixtureReport) -> String {
        report.response.clone()
    }
}
