//! Parse-time argument errors.
//!
//! Every failure raised while tokens are being consumed is an
//! [`ArgumentError`]. The error carries a stable [`ArgumentErrorKind`], the
//! parameter name or token that caused it, an optional message, an optional
//! underlying cause, and any errors that were suppressed while the primary
//! one was already in flight (for example a command file that could not be
//! deleted while the source was being closed after a failed parse).

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed error type used for causes raised by user-supplied code.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Category of an [`ArgumentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ArgumentErrorKind {
    /// A required token or value was absent.
    Missing,
    /// A token was present but failed type-specific parsing.
    InvalidFormat,
    /// A token parsed syntactically but failed semantic validation.
    InvalidValue,
    /// A token matched no parameter, sub-command, or positional slot.
    Unrecognized,
    /// A command file could not be opened, read, or deleted.
    Resolution,
    /// A custom converter failed with an error that is not an argument error.
    Interpretation,
}

impl fmt::Display for ArgumentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing argument"),
            Self::InvalidFormat => f.write_str("invalid argument format"),
            Self::InvalidValue => f.write_str("invalid argument value"),
            Self::Unrecognized => f.write_str("unrecognized argument"),
            Self::Resolution => f.write_str("argument resolution failed"),
            Self::Interpretation => f.write_str("failed to interpret argument"),
        }
    }
}

/// An error raised while consuming command-line tokens.
///
/// # Example
///
/// ```
/// use argot_runtime::{ArgumentError, ArgumentErrorKind};
///
/// let error = ArgumentError::unrecognized("--bogus");
/// assert_eq!(error.kind(), ArgumentErrorKind::Unrecognized);
/// assert_eq!(error.parameter(), "--bogus");
/// ```
#[derive(Debug, Error)]
#[error("{kind}: {parameter}{}", message_suffix(.message.as_deref()))]
pub struct ArgumentError {
    kind: ArgumentErrorKind,
    parameter: String,
    message: Option<String>,
    #[source]
    source: Option<BoxError>,
    suppressed: Vec<ArgumentError>,
}

impl ArgumentError {
    /// Creates an error of the given kind for a parameter or token.
    #[must_use]
    pub fn new(kind: ArgumentErrorKind, parameter: impl Into<String>) -> Self {
        Self {
            kind,
            parameter: parameter.into(),
            message: None,
            source: None,
            suppressed: Vec::new(),
        }
    }

    /// Creates a missing-argument error.
    #[must_use]
    pub fn missing(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ArgumentErrorKind::Missing, parameter).with_message(message)
    }

    /// Creates an invalid-format error.
    #[must_use]
    pub fn invalid_format(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ArgumentErrorKind::InvalidFormat, parameter).with_message(message)
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid_value(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ArgumentErrorKind::InvalidValue, parameter).with_message(message)
    }

    /// Creates an unrecognized-argument error naming the offending token.
    #[must_use]
    pub fn unrecognized(argument: impl Into<String>) -> Self {
        Self::new(ArgumentErrorKind::Unrecognized, argument).with_message("Unrecognized argument")
    }

    /// Creates a command-file resolution error.
    #[must_use]
    pub fn resolution(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ArgumentErrorKind::Resolution, parameter).with_message(message)
    }

    /// Wraps a failure raised by a custom converter.
    #[must_use]
    pub fn interpretation(parameter: impl Into<String>, cause: BoxError) -> Self {
        Self::new(ArgumentErrorKind::Interpretation, parameter)
            .with_message("Failed to interpret the argument(s)")
            .with_source(cause)
    }

    /// Replaces the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches an error that occurred while this one was already in flight.
    #[must_use]
    pub fn with_suppressed(mut self, suppressed: Self) -> Self {
        self.suppressed.push(suppressed);
        self
    }

    /// Records a suppressed error in place.
    pub fn add_suppressed(&mut self, suppressed: Self) {
        self.suppressed.push(suppressed);
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ArgumentErrorKind {
        self.kind
    }

    /// Returns the parameter name or token the error refers to.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Returns the message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the errors suppressed onto this one.
    #[must_use]
    pub fn suppressed(&self) -> &[Self] {
        &self.suppressed
    }
}

fn message_suffix(message: Option<&str>) -> String {
    message.map_or_else(String::new, |text| format!(": {text}"))
}

/// Keeps the first error and suppresses every later one onto it.
pub(crate) fn merge_failure(slot: &mut Option<ArgumentError>, error: ArgumentError) {
    match slot {
        Some(first) => first.add_suppressed(error),
        None => *slot = Some(error),
    }
}
