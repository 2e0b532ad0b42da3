//! core::error
//!
//! Errors raised while parsing git command output.
//!
//! A parse either succeeds completely or fails at the first structural
//! violation. There is no partial result and no recovery: every variant means
//! the command was invoked with the wrong flags, its output was truncated, or
//! the installed git renders output in a shape this crate does not know.

use thiserror::Error;

use super::types::FormatError;

/// Git output did not have the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A line did not start with the required prefix.
    #[error("line {line_number}: expected '{expected}' but got '{line}'")]
    UnexpectedLine {
        /// 1-based line number within the output
        line_number: usize,
        /// The prefix that was required
        expected: &'static str,
        /// The offending line
        line: String,
    },

    /// A blank separator line was required.
    #[error("line {line_number}: expected blank line but got '{line}'")]
    ExpectedBlankLine {
        /// 1-based line number within the output
        line_number: usize,
        /// The offending line
        line: String,
    },

    /// Output ended in the middle of a record.
    #[error("unexpected end of output after line {line_number}")]
    UnexpectedEnd {
        /// Number of lines read before the output ended
        line_number: usize,
    },

    /// A ref listing line did not split into a hash and a name.
    #[error("malformed ref line '{line}': expected '<sha1> <refname>'")]
    MalformedRefLine {
        /// The offending line
        line: String,
    },

    /// The same ref name was listed twice.
    #[error("duplicate ref '{name}'")]
    DuplicateRef {
        /// The repeated name
        name: String,
    },

    /// A date field was not a strict ISO-8601 timestamp with offset.
    #[error("line {line_number}: invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// 1-based line number within the output
        line_number: usize,
        /// The rejected timestamp text
        value: String,
    },

    /// A hash or ref name field failed identifier validation.
    #[error("invalid identifier in '{line}': {source}")]
    InvalidIdentifier {
        /// The line containing the field
        line: String,
        /// Why the field was rejected
        source: FormatError,
    },

    /// Reading a live output stream failed.
    #[error("failed to read output: {0}")]
    Io(#[from] std::io::Error),
}
