//! Runtime for the `argot` schema inspection tool.
//!
//! A schema is a JSON document describing a command tree (see
//! [`argot::Schema`]). `argot check` resolves it and lists every command
//! with its usage string. `argot parse` also runs the parser over the tokens
//! given after `--` and prints the populated record chain, or the help
//! request when a help command was entered. Schemas may reference the
//! converters returned by [`stock_bindings`]. Lifecycle hooks cannot be
//! bound from a schema file, so hook declarations fail resolution here.

mod bindings;
mod cli;
mod errors;
mod output;
pub mod telemetry;

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use argot::{CommandModel, Parser, Schema, resolve};
use clap::Parser as _;
use tracing::debug;

pub use bindings::{STOCK_SCOPE, stock_bindings};
use cli::{Cli, CliCommand};
use errors::AppError;

const CLI_TARGET: &str = "argot_cli";

/// Runs the tool with the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };
    match execute(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "error: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Writes clap's rendering of `error`; help and version go to stdout.
fn report_usage<W: Write, E: Write>(error: &clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode {
    let rendered = error.render();
    let _ = if error.use_stderr() {
        write!(stderr, "{rendered}")
    } else {
        write!(stdout, "{rendered}")
    };
    u8::try_from(error.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<(), AppError> {
    telemetry::initialise(&cli.log_filter, cli.log_format)?;
    match &cli.command {
        CliCommand::Check { schema } => {
            let model = load_model(schema, false)?;
            output::write_commands(&model, cli.output, stdout)
        }
        CliCommand::Parse {
            schema,
            plain,
            tokens,
        } => {
            let model = load_model(schema, *plain)?;
            let outcome = Parser::new(&model).parse(tokens.iter().cloned())?;
            output::write_outcome(&model, &outcome, cli.output, stdout)
        }
    }
}

fn load_model(path: &Path, plain: bool) -> Result<CommandModel, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::ReadSchema {
        path: path.display().to_string(),
        source,
    })?;
    let mut schema: Schema =
        serde_json::from_str(&text).map_err(|source| AppError::DecodeSchema {
            path: path.display().to_string(),
            source,
        })?;
    if plain {
        schema.settings.command_files = false;
    }
    debug!(target: CLI_TARGET, path = %path.display(), plain, "resolving schema");
    resolve(&schema, &stock_bindings()).map_err(AppError::from)
}

#[cfg(test)]
mod tests;
