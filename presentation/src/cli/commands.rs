//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full formatted output with all phases
    Full,
    /// Only the final compiled answer
    Final,
    /// JSON output
    Json,
}

/// CLI arguments for concord
#[derive(Parser, Debug)]
#[command(name = "concord")]
#[command(author, version, about = "Multi-agent problem solving - a panel of models works a problem through six phases")]
#[command(long_about = r#"
Concord runs a panel of models through six sequential phases:
Understanding, Representation, Planning, Execution, Verification,
and Compilation. Within each phase the panel drafts a shared artifact,
then critiques and revises it until every agent accepts it (or the
iteration ceiling forces the phase to advance).

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./concord.toml      Project-level config
3. ~/.config/concord/config.toml   Global config

Example:
  concord "A train leaves station A at 9am travelling 60mph..."
  concord -m gpt-4o -m o3-mini --max-iterations 5 "Prove that..."
  concord --conversation "Design a rate limiter"
"#)]
pub struct Cli {
    /// The problem to solve
    pub problem: Option<String>,

    /// Models on the panel (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Panel size when using the default model for every agent
    #[arg(long, value_name = "N", conflicts_with = "model")]
    pub agents: Option<usize>,

    /// Model to use as moderator for merging drafts
    #[arg(long, value_name = "MODEL")]
    pub moderator: Option<String>,

    /// Consensus sweeps allowed per phase (0 skips critique entirely)
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Independent candidates per initial draft
    #[arg(long, value_name = "N")]
    pub candidates: Option<usize>,

    /// Run the two-agent conversation variant instead of the panel
    #[arg(long)]
    pub conversation: bool,

    /// Chat turns per phase in conversation mode
    #[arg(long, value_name = "N")]
    pub turn_budget: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
