//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is enabled, output is machine-readable JSON.

use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        // Status text only; a closed stdout is not worth failing over
        let _ = writeln!(io::stdout().lock(), "{}", message);
    }
}

/// Write one line of a command's result to stdout (always shown).
///
/// Unlike `println!` this reports a closed pipe as an error, so a handler
/// printing history into `head` stops walking it. See [`is_broken_pipe`].
pub fn line(message: impl Display) -> io::Result<()> {
    write_line(&mut io::stdout().lock(), message)
}

fn write_line(out: &mut impl Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "{}", message)?;
    out.flush()
}

/// Whether an error chain ends in stdout being closed by its reader.
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a value as pretty JSON (always shown; it is the command's result).
pub fn json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    line(serde_json::to_string_pretty(value)?)
}
