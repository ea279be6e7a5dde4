//! Entry point for the `argot` schema inspection tool.
//!
//! The binary delegates to [`argot_cli::run`], which parses the command line,
//! installs telemetry and writes results to the supplied streams.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    argot_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
