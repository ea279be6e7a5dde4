//! Command-file expansion.
//!
//! [`CommandFileTokens`] splices the lines of referenced files into the
//! token stream:
//!
//! - `@<path>` is replaced in place by the lines of the file at `path`. The
//!   file is opened only when the marker is reached and read one line at a
//!   time.
//! - `@!delete!@<path>` behaves the same way, and the file is deleted once it
//!   has been fully consumed, or when the source is closed if it never was.
//! - `\@<rest>` yields the literal token `@<rest>`.
//!
//! Lines read from a file are never scanned for markers again.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::TokenSource;
use crate::error::{ArgumentError, merge_failure};

/// Tracing target for command-file expansion.
const TOKENS_TARGET: &str = "argot_runtime::tokens";

/// Marker prefix referencing a command file.
pub const COMMAND_FILE_PREFIX: &str = "@";

/// Marker prefix referencing a command file that is deleted after use.
pub const COMMAND_FILE_DELETE_PREFIX: &str = "@!delete!@";

/// Prefix of a token that starts with a literal `@`.
pub const ESCAPED_PREFIX: &str = "\\@";

#[derive(Debug)]
struct OpenFile {
    marker: String,
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    delete: bool,
}

/// A token source that expands `@file` references.
///
/// The source must be closed to guarantee that files referenced through
/// delete markers are removed. Dropping an unclosed source closes it and
/// logs any failure.
#[derive(Debug)]
pub struct CommandFileTokens<I>
where
    I: Iterator<Item = String>,
{
    args: I,
    file: Option<OpenFile>,
    pending: Option<String>,
    closed: bool,
}

impl<I> CommandFileTokens<I>
where
    I: Iterator<Item = String>,
{
    /// Wraps an iterator of raw tokens.
    #[must_use]
    pub const fn new(args: I) -> Self {
        Self {
            args,
            file: None,
            pending: None,
            closed: false,
        }
    }

    fn fill(&mut self) -> Result<(), ArgumentError> {
        while self.pending.is_none() && !self.closed {
            if let Some(file) = self.file.as_mut() {
                match file.lines.next() {
                    Some(Ok(line)) => self.pending = Some(line),
                    Some(Err(err)) => {
                        let mut failure =
                            ArgumentError::resolution(&file.marker, "Failed to read command file")
                                .with_source(err);
                        if let Some(failed) = self.file.take()
                            && let Err(error) = finish(failed)
                        {
                            failure.add_suppressed(error);
                        }
                        return Err(failure);
                    }
                    None => {
                        if let Some(exhausted) = self.file.take() {
                            finish(exhausted)?;
                        }
                    }
                }
                continue;
            }
            let Some(token) = self.args.next() else {
                return Ok(());
            };
            self.pending = self.expand(token)?;
        }
        Ok(())
    }

    /// Expands one raw token. Returns `None` when the token opened a file.
    fn expand(&mut self, token: String) -> Result<Option<String>, ArgumentError> {
        if let Some(path) = token
            .strip_prefix(COMMAND_FILE_DELETE_PREFIX)
            .map(str::to_owned)
        {
            self.open(token, &path, true)?;
            return Ok(None);
        }
        if let Some(path) = token.strip_prefix(COMMAND_FILE_PREFIX).map(str::to_owned) {
            self.open(token, &path, false)?;
            return Ok(None);
        }
        if token.starts_with(ESCAPED_PREFIX) {
            return Ok(token.strip_prefix('\\').map(str::to_owned));
        }
        Ok(Some(token))
    }

    fn open(&mut self, marker: String, raw_path: &str, delete: bool) -> Result<(), ArgumentError> {
        let path = checked_path(&marker, raw_path)?;
        debug!(
            target: TOKENS_TARGET,
            path = %path.display(),
            delete,
            "opening command file"
        );
        match File::open(&path) {
            Ok(file) => {
                self.file = Some(OpenFile {
                    marker,
                    path,
                    lines: BufReader::new(file).lines(),
                    delete,
                });
                Ok(())
            }
            Err(err) => {
                let mut failure = ArgumentError::resolution(
                    &marker,
                    format!("Failed to open command file: {}", path.display()),
                )
                .with_source(err);
                if delete && let Err(error) = delete_file(&marker, &path) {
                    failure.add_suppressed(error);
                }
                Err(failure)
            }
        }
    }
}

impl<I> TokenSource for CommandFileTokens<I>
where
    I: Iterator<Item = String>,
{
    fn peek(&mut self) -> Result<Option<&str>, ArgumentError> {
        self.fill()?;
        Ok(self.pending.as_deref())
    }

    fn next_token(&mut self) -> Result<Option<String>, ArgumentError> {
        self.fill()?;
        Ok(self.pending.take())
    }

    fn close(&mut self) -> Result<(), ArgumentError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.pending = None;

        let mut failure = None;
        if let Some(file) = self.file.take()
            && let Err(error) = finish(file)
        {
            merge_failure(&mut failure, error);
        }
        for token in self.args.by_ref() {
            let Some(raw_path) = token.strip_prefix(COMMAND_FILE_DELETE_PREFIX) else {
                continue;
            };
            let outcome =
                checked_path(&token, raw_path).and_then(|path| delete_file(&token, &path));
            if let Err(error) = outcome {
                merge_failure(&mut failure, error);
            }
        }
        failure.map_or(Ok(()), Err)
    }
}

impl<I> Drop for CommandFileTokens<I>
where
    I: Iterator<Item = String>,
{
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            warn!(
                target: TOKENS_TARGET,
                %error,
                "failed to clean up command files on drop"
            );
        }
    }
}

fn checked_path(marker: &str, path: &str) -> Result<PathBuf, ArgumentError> {
    if path.is_empty() || path.contains('\0') {
        return Err(ArgumentError::invalid_value(
            marker,
            format!("Invalid command file path: {path}"),
        ));
    }
    Ok(PathBuf::from(path))
}

/// Releases the file handle and deletes the file when it was a delete marker.
fn finish(file: OpenFile) -> Result<(), ArgumentError> {
    let OpenFile {
        marker,
        path,
        lines,
        delete,
    } = file;
    drop(lines);
    debug!(
        target: TOKENS_TARGET,
        path = %path.display(),
        delete,
        "finished command file"
    );
    if delete {
        delete_file(&marker, &path)?;
    }
    Ok(())
}

fn delete_file(marker: &str, path: &Path) -> Result<(), ArgumentError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(target: TOKENS_TARGET, path = %path.display(), "deleted command file");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ArgumentError::resolution(
            marker,
            format!("Failed to delete command file: {}", path.display()),
        )
        .with_source(err)),
    }
}
