//! Rendering of resolved models and parse outcomes.

use std::io::Write;

use argot::{CommandId, CommandModel, HelpRequest, Invocation, Outcome, Record};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::errors::AppError;

const ROOT_LABEL: &str = "<root>";

#[derive(Debug, Serialize)]
struct CommandSummary<'a> {
    path: Vec<&'a str>,
    #[serde(rename = "type")]
    type_name: &'a str,
    usage: String,
    deprecated: bool,
}

#[derive(Debug, Serialize)]
struct LevelSummary<'a> {
    path: Vec<&'a str>,
    record: &'a Record,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum OutcomeSummary<'a> {
    Run {
        levels: Vec<LevelSummary<'a>>,
    },
    Help {
        path: &'a [String],
        usage: &'a str,
        unrecognized: Option<&'a str>,
    },
}

/// Writes every command of `model` with its usage string.
pub(crate) fn write_commands<W: Write>(
    model: &CommandModel,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    let summaries: Vec<CommandSummary<'_>> = model
        .commands()
        .map(|(id, command)| CommandSummary {
            path: command_path(model, id),
            type_name: command.type_name(),
            usage: model.usage(id),
            deprecated: command.is_deprecated(),
        })
        .collect();
    match format {
        OutputFormat::Json => write_json(&summaries, out),
        OutputFormat::Human => {
            for summary in &summaries {
                let line = format!("{}: {}", label(&summary.path), summary.usage);
                writeln!(out, "{}", line.trim_end())?;
            }
            Ok(())
        }
    }
}

/// Writes the result of a parse.
pub(crate) fn write_outcome<W: Write>(
    model: &CommandModel,
    outcome: &Outcome<'_>,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), AppError> {
    let summary = match outcome {
        Outcome::Run(invocation) => run_summary(model, invocation),
        Outcome::Help(help) => help_summary(help),
    };
    match format {
        OutputFormat::Json => write_json(&summary, out),
        OutputFormat::Human => write_human_outcome(&summary, out),
    }
}

fn write_human_outcome<W: Write>(summary: &OutcomeSummary<'_>, out: &mut W) -> Result<(), AppError> {
    match summary {
        OutcomeSummary::Run { levels } => {
            for level in levels {
                let record = serde_json::to_string(level.record).map_err(AppError::Serialise)?;
                writeln!(out, "{} {record}", label(&level.path))?;
            }
        }
        OutcomeSummary::Help {
            usage,
            unrecognized,
            ..
        } => {
            if let Some(token) = unrecognized {
                writeln!(out, "unknown command: {token}")?;
            }
            writeln!(out, "usage: {usage}")?;
        }
    }
    Ok(())
}

fn run_summary<'a>(model: &'a CommandModel, invocation: &'a Invocation<'_>) -> OutcomeSummary<'a> {
    let levels = invocation
        .levels()
        .iter()
        .map(|level| LevelSummary {
            path: command_path(model, level.command()),
            record: level.record(),
        })
        .collect();
    OutcomeSummary::Run { levels }
}

fn help_summary(help: &HelpRequest) -> OutcomeSummary<'_> {
    OutcomeSummary::Help {
        path: help.path(),
        usage: help.usage(),
        unrecognized: help.unrecognized(),
    }
}

/// Returns the first name of every command below the root down to `id`.
fn command_path(model: &CommandModel, id: CommandId) -> Vec<&str> {
    model
        .lineage(id)
        .into_iter()
        .skip(1)
        .filter_map(|ancestor| model.command(ancestor).names().first())
        .map(String::as_str)
        .collect()
}

fn label(path: &[&str]) -> String {
    if path.is_empty() {
        ROOT_LABEL.to_owned()
    } else {
        path.join(" ")
    }
}

fn write_json<T: Serialize, W: Write>(value: &T, out: &mut W) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(AppError::Serialise)?;
    writeln!(out)?;
    Ok(())
}
