//! Token parsing against a resolved command model.
//!
//! Parsing runs one command level at a time, starting at the root:
//!
//! 1. leading positional parameters, in slot order, until tokens run out;
//! 2. the main loop, trying map prefixes, then parameter names, then
//!    sub-command names against the next token;
//! 3. the default sub-command or, when there is none, the trailing
//!    positional parameters followed by a check for leftover tokens;
//! 4. the required-parameter check, before descending into a sub-command.
//!
//! The deepest level reached is the call target.

use argot_model::{Command, CommandId, CommandModel, ConversionFailure, Converter, Parameter};
use argot_runtime::keyvalue::{self, KeyValue};
use argot_runtime::{ArgumentError, Record, TokenSource, Value, convert, tokens};
use tracing::debug;

use crate::invocation::{Invocation, Level};
use crate::required::RequiredSet;

const PARSER_TARGET: &str = "argot::parser";

/// Message attached to the missing-argument error of the required check.
const REQUIRED_MISSING: &str = "Required parameters missing.";

/// The result of a successful parse.
#[derive(Debug)]
pub enum Outcome<'m> {
    /// Every level parsed; the invocation is ready to be called.
    Run(Invocation<'m>),
    /// The first token named a help command.
    Help(HelpRequest),
}

/// A request for help about one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpRequest {
    command: CommandId,
    path: Vec<String>,
    unrecognized: Option<String>,
    usage: String,
}

impl HelpRequest {
    /// Returns the deepest command the request addressed.
    #[must_use]
    pub const fn command(&self) -> CommandId {
        self.command
    }

    /// Returns the sub-command names walked from the root.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns the first token that named no sub-command, if any.
    #[must_use]
    pub fn unrecognized(&self) -> Option<&str> {
        self.unrecognized.as_deref()
    }

    /// Returns the usage string of the addressed command.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }
}

/// Parses token streams against a [`CommandModel`].
///
/// A parser is cheap to create and holds no per-parse state; each parse
/// builds fresh records.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'m> {
    model: &'m CommandModel,
}

impl<'m> Parser<'m> {
    /// Creates a parser for `model`.
    #[must_use]
    pub const fn new(model: &'m CommandModel) -> Self {
        Self { model }
    }

    /// Parses `args`, expanding `@file` references when the model's
    /// settings enable them.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when the tokens do not fit the model or
    /// when a command file cannot be read or deleted.
    pub fn parse<I, S>(&self, args: I) -> Result<Outcome<'m>, ArgumentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = args.into_iter().map(Into::into);
        if self.model.settings().command_files {
            self.parse_tokens(&mut tokens::command_files(args))
        } else {
            self.parse_tokens(&mut tokens::plain(args))
        }
    }

    /// Parses from an existing token source, closing it afterwards.
    ///
    /// A close failure after a successful parse is returned as the error;
    /// after a failed parse it is attached to the parse error as suppressed.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when the tokens do not fit the model or
    /// when the source fails.
    pub fn parse_tokens(&self, tokens: &mut dyn TokenSource) -> Result<Outcome<'m>, ArgumentError> {
        let parsed = self.run(tokens);
        match (parsed, tokens.close()) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(error)) | (Err(error), Ok(())) => Err(error),
            (Err(error), Err(close_error)) => Err(error.with_suppressed(close_error)),
        }
    }

    fn run(&self, tokens: &mut dyn TokenSource) -> Result<Outcome<'m>, ArgumentError> {
        if let Some(help) = self.help_request(tokens)? {
            return Ok(Outcome::Help(help));
        }
        let mut levels = Vec::new();
        let mut current = Some(self.model.root());
        while let Some(id) = current {
            let (record, next) = self.parse_level(id, tokens)?;
            levels.push(Level::new(id, record));
            current = next;
        }
        Ok(Outcome::Run(Invocation::new(self.model, levels)))
    }

    fn help_request(&self, tokens: &mut dyn TokenSource) -> Result<Option<HelpRequest>, ArgumentError> {
        let help_commands = self.model.help_commands();
        let requested = tokens
            .peek()?
            .is_some_and(|first| help_commands.iter().any(|name| name == first));
        if !requested {
            return Ok(None);
        }
        tokens.next_token()?;

        let mut command = self.model.root();
        let mut path = Vec::new();
        let mut unrecognized = None;
        while let Some(token) = tokens.next_token()? {
            match self.model.command(command).find_subcommand(&token) {
                Some(subcommand) => {
                    command = subcommand.command();
                    path.push(token);
                }
                None => {
                    unrecognized = Some(token);
                    break;
                }
            }
        }
        debug!(target: PARSER_TARGET, path = ?path, "help requested");
        Ok(Some(HelpRequest {
            command,
            path,
            unrecognized,
            usage: self.model.usage(command),
        }))
    }

    /// Parses one level and returns its record with the sub-command to
    /// descend into, if any.
    fn parse_level(
        &self,
        id: CommandId,
        tokens: &mut dyn TokenSource,
    ) -> Result<(Record, Option<CommandId>), ArgumentError> {
        let command = self.model.command(id);
        debug!(target: PARSER_TARGET, command = command.type_name(), "parsing level");
        let mut record = Record::new(command.type_name());
        let mut seen = RequiredSet::new(command.required_count());

        for parameter in command.leading_positionals() {
            if !tokens.has_next()? {
                break;
            }
            store(&mut record, &mut seen, parameter, parameter.display_name(), tokens)?;
        }

        let entered = main_loop(command, &mut record, &mut seen, tokens)?;
        let next = match entered.or(command.default_subcommand()) {
            Some(child) => Some(child),
            None => {
                for parameter in command.trailing_positionals() {
                    if !tokens.has_next()? {
                        break;
                    }
                    store(&mut record, &mut seen, parameter, parameter.display_name(), tokens)?;
                }
                if let Some(extra) = tokens.peek()? {
                    return Err(ArgumentError::unrecognized(extra));
                }
                None
            }
        };
        check_required(command, &seen)?;
        if let Some(child) = next {
            debug!(
                target: PARSER_TARGET,
                command = command.type_name(),
                subcommand = self.model.command(child).type_name(),
                "entering sub-command"
            );
        }
        Ok((record, next))
    }
}

/// Runs the main matching loop and returns the sub-command named by a
/// token, if one was consumed.
fn main_loop(
    command: &Command,
    record: &mut Record,
    seen: &mut RequiredSet,
    tokens: &mut dyn TokenSource,
) -> Result<Option<CommandId>, ArgumentError> {
    while let Some(token) = tokens.peek()?.map(str::to_owned) {
        if let Some((prefix, parameter)) = command.find_map_parameter(&token) {
            tokens.next_token()?;
            mark(seen, parameter);
            if let Some(KeyValue { key, value }) = keyvalue::split_key_value(prefix, &token) {
                record.put_entry(parameter.path(), key, value);
            }
            continue;
        }
        if let Some(parameter) = command.find_parameter(&token) {
            tokens.next_token()?;
            store(record, seen, parameter, &token, tokens)?;
            continue;
        }
        if let Some(subcommand) = command.find_subcommand(&token) {
            tokens.next_token()?;
            return Ok(Some(subcommand.command()));
        }
        if command.default_subcommand().is_some() || command.has_trailing_positionals() {
            break;
        }
        return Err(ArgumentError::unrecognized(token));
    }
    Ok(None)
}

fn mark(seen: &mut RequiredSet, parameter: &Parameter) {
    if let Some(ordinal) = parameter.required_ordinal() {
        seen.mark(ordinal);
    }
}

/// Converts the value of `parameter` and writes it into `record`.
///
/// `token` is the matched name, or the parameter name for positionals.
fn store(
    record: &mut Record,
    seen: &mut RequiredSet,
    parameter: &Parameter,
    token: &str,
    tokens: &mut dyn TokenSource,
) -> Result<(), ArgumentError> {
    mark(seen, parameter);
    let value = match parameter.converter() {
        Converter::Flag(literal) => Value::Bool(*literal),
        Converter::KeyValue => return Err(ArgumentError::unrecognized(token)),
        Converter::Builtin(kind) => kind.parse(token, tokens)?,
        Converter::Enum {
            type_name,
            constants,
            case_insensitive,
        } => Value::Enum(convert::parse_enum(
            token,
            tokens,
            type_name,
            constants,
            *case_insensitive,
        )?),
        Converter::Custom { callable, .. } => {
            callable(token, tokens).map_err(|failure| match failure {
                ConversionFailure::Argument(error) => error,
                ConversionFailure::Other(cause) => ArgumentError::interpretation(token, cause),
            })?
        }
    };
    if parameter.is_multi() {
        record.append(parameter.path(), value);
    } else {
        record.assign(parameter.path(), value);
    }
    Ok(())
}

fn check_required(command: &Command, seen: &RequiredSet) -> Result<(), ArgumentError> {
    let Some(ordinal) = seen.first_missing() else {
        return Ok(());
    };
    let name = command
        .required_parameter(ordinal)
        .map_or("", Parameter::display_name);
    Err(ArgumentError::missing(name, REQUIRED_MISSING))
}
