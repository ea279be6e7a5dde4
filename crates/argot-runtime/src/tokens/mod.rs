//! Lazy, peekable token streams.
//!
//! A [`TokenSource`] hands tokens to the parser one at a time. Sources are
//! not restartable: once a token has been consumed it is gone. Two
//! implementations are provided:
//!
//! - [`PlainTokens`] passes tokens through unchanged.
//! - [`CommandFileTokens`] replaces `@<path>` markers with the lines of the
//!   referenced file (see [`command_file`]).

pub mod command_file;

pub use command_file::CommandFileTokens;

use crate::error::ArgumentError;

/// A lazy, peekable, non-restartable sequence of string tokens.
///
/// Exhaustion is reported as `Ok(None)`. Errors are only raised by sources
/// that perform I/O while producing tokens.
pub trait TokenSource {
    /// Returns the next token without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error when producing the token requires I/O that fails.
    fn peek(&mut self) -> Result<Option<&str>, ArgumentError>;

    /// Consumes and returns the next token.
    ///
    /// # Errors
    ///
    /// Returns an error when producing the token requires I/O that fails.
    fn next_token(&mut self) -> Result<Option<String>, ArgumentError>;

    /// Releases any held resources and performs outstanding clean-up.
    ///
    /// Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first clean-up failure, with later ones attached as
    /// suppressed errors.
    fn close(&mut self) -> Result<(), ArgumentError>;

    /// Reports whether another token is available.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`TokenSource::peek`].
    fn has_next(&mut self) -> Result<bool, ArgumentError> {
        Ok(self.peek()?.is_some())
    }

    /// Consumes the next token, failing when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a missing-argument error naming `parameter` when no token is
    /// left.
    fn require_next(&mut self, parameter: &str) -> Result<String, ArgumentError> {
        self.next_token()?
            .ok_or_else(|| ArgumentError::missing(parameter, "Missing argument"))
    }
}

/// A token source that yields its input unchanged.
#[derive(Debug)]
pub struct PlainTokens<I>
where
    I: Iterator<Item = String>,
{
    args: I,
    pending: Option<String>,
}

impl<I> PlainTokens<I>
where
    I: Iterator<Item = String>,
{
    /// Wraps an iterator of tokens.
    #[must_use]
    pub const fn new(args: I) -> Self {
        Self {
            args,
            pending: None,
        }
    }
}

impl<I> TokenSource for PlainTokens<I>
where
    I: Iterator<Item = String>,
{
    fn peek(&mut self) -> Result<Option<&str>, ArgumentError> {
        if self.pending.is_none() {
            self.pending = self.args.next();
        }
        Ok(self.pending.as_deref())
    }

    fn next_token(&mut self) -> Result<Option<String>, ArgumentError> {
        Ok(self.pending.take().or_else(|| self.args.next()))
    }

    fn close(&mut self) -> Result<(), ArgumentError> {
        Ok(())
    }
}

/// Builds a plain source over `args`.
#[must_use]
pub fn plain<A>(args: A) -> PlainTokens<A::IntoIter>
where
    A: IntoIterator<Item = String>,
{
    PlainTokens::new(args.into_iter())
}

/// Builds a command-file-expanding source over `args`.
#[must_use]
pub fn command_files<A>(args: A) -> CommandFileTokens<A::IntoIter>
where
    A: IntoIterator<Item = String>,
{
    CommandFileTokens::new(args.into_iter())
}
