//! Command-line definitions for the `argot` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::telemetry::LogFormat;

/// Default filter applied when `ARGOT_LOG` is unset.
pub(crate) const DEFAULT_LOG_FILTER: &str = "warn";

/// Output format for inspection results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One line per command or level.
    #[default]
    Human,
    /// A single pretty-printed JSON document.
    Json,
}

/// Inspects declarative command schemas.
#[derive(Parser, Debug)]
#[command(name = "argot", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Tracing filter directives.
    #[arg(long, env = "ARGOT_LOG", default_value = DEFAULT_LOG_FILTER, global = true)]
    pub(crate) log_filter: String,
    /// Log line format.
    #[arg(long, env = "ARGOT_LOG_FORMAT", default_value_t = LogFormat::Compact, global = true)]
    pub(crate) log_format: LogFormat,
    /// How results are written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    pub(crate) output: OutputFormat,
    /// The action to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Actions offered by the binary.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Resolves a schema and lists every command with its usage.
    Check {
        /// Path to the JSON schema.
        schema: PathBuf,
    },
    /// Resolves a schema and parses tokens against it.
    Parse {
        /// Path to the JSON schema.
        schema: PathBuf,
        /// Treats `@file` tokens literally.
        #[arg(long)]
        plain: bool,
        /// Tokens handed to the parser.
        #[arg(
            value_name = "TOKEN",
            num_args = 0..,
            last = true,
            allow_hyphen_values = true
        )]
        tokens: Vec<String>,
    },
}
