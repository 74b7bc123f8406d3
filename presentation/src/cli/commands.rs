//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the mixture result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the aggregated response
    Text,
    /// Response with the mixture layout and timing
    Full,
    /// JSON output
    Json,
}

impl From<OutputFormat> for moa_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => moa_domain::OutputFormat::Text,
            OutputFormat::Full => moa_domain::OutputFormat::Full,
            OutputFormat::Json => moa_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for mixture-of-agents
#[derive(Parser, Debug)]
#[command(name = "moa")]
#[command(author, version, about = "Mixture of Agents - layered LLM ensembles with a final aggregator")]
#[command(long_about = r#"
Runs a prompt through a Mixture of Agents.

Each layer's agents answer concurrently. Their answers are joined and fed to
the next layer. The whole pass repeats for every iteration, and an aggregator
model synthesises the iteration outputs into one response.

Layers, agents and the aggregator are declared in moa.toml. Configuration files
are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./moa.toml          Project-level config
3. ~/.config/mixture-of-agents/moa.toml   Global config

Example:
  moa "Explain the CAP theorem with an example"
  echo "Summarise this diff" | moa --iterations 2 --max-parallel 3
  moa -o json --timeout 60 "Compare Raft and Paxos"
"#)]
pub struct Cli {
    /// The prompt to run (read from stdin when omitted)
    pub prompt: Option<String>,

    /// Number of iterations (overrides [mixture].iterations)
    #[arg(short = 'n', long, value_name = "N")]
    pub iterations: Option<usize>,

    /// Maximum agents in flight per layer, 0 for no cap
    #[arg(short = 'p', long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Per-agent timeout in seconds, 0 for none
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (defaults to [output].format, then text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
