//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every role's findings, consistency check, timings and errors
    Full,
    /// Combined summary and consistency verdict only
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for incident-quorum
#[derive(Parser, Debug)]
#[command(name = "incident-quorum")]
#[command(author, version, about = "Multi-agent incident analysis with cross-agent consistency checks")]
#[command(long_about = r#"
Incident Quorum analyzes an incident with independent specialist agents and
checks them against each other.

Roles:
  Root-Cause, Impact, Actions   analysis roles, compared by the consistency check
  Knowledge                     knowledge-base suggestions, reference only
  Consistency                   separates factual conflicts from interpretation variance

CRITICAL incidents detected with confidence >= 0.75 run Actions after the
other roles so remediation can build on their findings. Everything else runs
in parallel.

Configuration files are loaded from (in priority order):
1. INCIDENT_QUORUM_* environment variables (__ separates sections)
2. --config <path>                                Explicit config file
3. ./incident-quorum.toml                         Project-level config
4. ~/.config/incident-quorum/config.toml          Global config

Example:
  incident-quorum --facts facts.json --log incident.log
  incident-quorum --facts facts.json --kb kb.json -o json --backend ollama
"#)]
pub struct Cli {
    /// Incident facts JSON produced by the log classifier
    #[arg(short, long, value_name = "PATH", required_unless_present = "show_config")]
    pub facts: Option<PathBuf>,

    /// Sanitized log file (replaces the log text in the facts file)
    #[arg(short, long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Pre-fetched knowledge-base search results JSON
    #[arg(long, value_name = "PATH")]
    pub kb: Option<PathBuf>,

    /// Output format [default: full, or [output] format from config]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Completion backend: ollama, groq or claude
    #[arg(short, long, value_name = "KIND")]
    pub backend: Option<String>,

    /// Model name for the selected backend
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Append analysis events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Plain progress lines instead of progress bars
    #[arg(long)]
    pub plain_progress: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "incident-quorum",
            "--facts",
            "facts.json",
            "--log",
            "incident.log",
            "-o",
            "summary",
            "--backend",
            "ollama",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.facts, Some(PathBuf::from("facts.json")));
        assert_eq!(cli.log, Some(PathBuf::from("incident.log")));
        assert_eq!(cli.output, Some(OutputFormat::Summary));
        assert_eq!(cli.backend.as_deref(), Some("ollama"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_facts_required_unless_show_config() {
        assert!(Cli::try_parse_from(["incident-quorum"]).is_err());

        let cli = Cli::try_parse_from(["incident-quorum", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.facts.is_none());
    }
}
