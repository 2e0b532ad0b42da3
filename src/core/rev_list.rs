//! core::rev_list
//!
//! Commit records and the streaming parser for `rev-list` output.
//!
//! # Input Shape
//!
//! Output of `git rev-list --parents --format=fuller --date=iso-strict`:
//!
//! ```text
//! commit <sha1> [<parent-sha1> ...]
//! Merge: <short> <short>
//! Author:     A U Thor <author@example.com>
//! AuthorDate: 2024-01-15T10:30:00+01:00
//! Commit:     C O Mitter <committer@example.com>
//! CommitDate: 2024-01-15T10:31:00+01:00
//!
//!     Subject line
//!
//!     Body text
//!
//! ```
//!
//! `Merge:` lines are optional and skipped. Message lines carry a four space
//! indent. Each record ends with a blank line, and the next record's `commit`
//! line follows directly.
//!
//! A commit with an empty message has no message block at all: the blank
//! line after `CommitDate:` is followed by the next `commit` line or the end
//! of output.
//!
//! # Laziness
//!
//! [`RevList`] is a forward-only iterator that pulls lines from a [`BufRead`]
//! and yields each commit as soon as its record is complete. Dropping it early
//! leaves the rest of the input unread. It cannot be restarted; parse again
//! from a fresh reader.
//!
//! # Example
//!
//! ```
//! use gitkit::core::rev_list::parse_rev_list;
//!
//! let output = "\
//! commit 1111111111111111111111111111111111111111
//! Author:     A U Thor <author@example.com>
//! AuthorDate: 2024-01-15T10:30:00+01:00
//! Commit:     A U Thor <author@example.com>
//! CommitDate: 2024-01-15T10:30:00+01:00
//!
//!     Initial commit
//!
//! ";
//!
//! let commits: Vec<_> = parse_rev_list(output).collect::<Result<_, _>>().unwrap();
//! assert_eq!(commits.len(), 1);
//! assert_eq!(commits[0].message(), "Initial commit\n");
//! ```

use std::io::BufRead;
use std::iter::FusedIterator;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::error::ParseError;
use super::types::Sha1;

const COMMIT_PREFIX: &str = "commit ";
const MERGE_PREFIX: &str = "Merge:";
const AUTHOR_PREFIX: &str = "Author:";
const AUTHOR_DATE_PREFIX: &str = "AuthorDate:";
const COMMITTER_PREFIX: &str = "Commit:";
const COMMIT_DATE_PREFIX: &str = "CommitDate:";
const MESSAGE_INDENT: &str = "    ";

/// `--date=iso-strict` layout, after normalising a `Z` suffix to `+00:00`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const TIMESTAMP_LEN: usize = "2024-01-15T10:30:00+01:00".len();

/// Basic information about a commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    sha1: Sha1,
    parent_sha1s: Vec<Sha1>,
    author: String,
    author_date: DateTime<FixedOffset>,
    committer: String,
    commit_date: DateTime<FixedOffset>,
    message_lines: Vec<String>,
    #[serde(skip)]
    message: OnceLock<String>,
}

impl CommitInfo {
    pub fn new(
        sha1: Sha1,
        parent_sha1s: Vec<Sha1>,
        author: String,
        author_date: DateTime<FixedOffset>,
        committer: String,
        commit_date: DateTime<FixedOffset>,
        message_lines: Vec<String>,
    ) -> Self {
        Self {
            sha1,
            parent_sha1s,
            author,
            author_date,
            committer,
            commit_date,
            message_lines,
            message: OnceLock::new(),
        }
    }

    pub fn sha1(&self) -> &Sha1 {
        &self.sha1
    }

    /// Parent hashes in git's order. Empty for root commits, and for output
    /// produced without `--parents`.
    pub fn parent_sha1s(&self) -> &[Sha1] {
        &self.parent_sha1s
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn author_date(&self) -> &DateTime<FixedOffset> {
        &self.author_date
    }

    pub fn committer(&self) -> &str {
        &self.committer
    }

    pub fn commit_date(&self) -> &DateTime<FixedOffset> {
        &self.commit_date
    }

    /// Message lines with their indent removed.
    pub fn message_lines(&self) -> &[String] {
        &self.message_lines
    }

    /// The full message, each line terminated by `\n`.
    ///
    /// Built on first use and cached.
    pub fn message(&self) -> &str {
        self.message.get_or_init(|| {
            self.message_lines
                .iter()
                .map(|line| format!("{line}\n"))
                .collect()
        })
    }
}

impl PartialEq for CommitInfo {
    fn eq(&self, other: &Self) -> bool {
        self.sha1 == other.sha1
            && self.parent_sha1s == other.parent_sha1s
            && self.author == other.author
            && self.author_date == other.author_date
            && self.committer == other.committer
            && self.commit_date == other.commit_date
            && self.message_lines == other.message_lines
    }
}

impl Eq for CommitInfo {}

/// Parse captured rev-list output.
pub fn parse_rev_list(output: &str) -> RevList<&[u8]> {
    RevList::new(output.as_bytes())
}

/// Lazy parser over rev-list output.
///
/// Yields `Ok(commit)` per record, then stops. On the first structural error
/// it yields that error once and then stops for good.
pub struct RevList<R> {
    reader: R,
    line_number: usize,
    /// A header line read while closing an empty-message record
    pending: Option<String>,
    finished: bool,
}

impl<R: BufRead> RevList<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pending: None,
            finished: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the parser has stopped, at end of input or after an error.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The underlying reader, positioned after the last consumed line.
    ///
    /// A `commit` line that ended an empty-message record has already been
    /// taken from the reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.line_number += 1;
        Ok(Some(line))
    }

    /// Read a line that must exist because a record is in progress.
    fn require_line(&mut self) -> Result<String, ParseError> {
        self.next_line()?.ok_or(ParseError::UnexpectedEnd {
            line_number: self.line_number,
        })
    }

    fn strip_prefix<'l>(&self, prefix: &'static str, line: &'l str) -> Result<&'l str, ParseError> {
        line.strip_prefix(prefix)
            .ok_or_else(|| ParseError::UnexpectedLine {
                line_number: self.line_number,
                expected: prefix,
                line: line.to_string(),
            })
    }

    fn expect_blank(&self, line: &str) -> Result<(), ParseError> {
        if !line.is_empty() {
            return Err(ParseError::ExpectedBlankLine {
                line_number: self.line_number,
                line: line.to_string(),
            });
        }
        Ok(())
    }

    fn parse_timestamp(&self, value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
        let invalid = || ParseError::InvalidTimestamp {
            line_number: self.line_number,
            value: value.to_string(),
        };

        // Newer git renders UTC as `Z`
        let normalized = match value.strip_suffix('Z') {
            Some(rest) => format!("{rest}+00:00"),
            None => value.to_string(),
        };
        if normalized.len() != TIMESTAMP_LEN {
            return Err(invalid());
        }
        DateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT).map_err(|_| invalid())
    }

    /// Parse one record, or `None` at a clean end of input.
    fn parse_commit(&mut self) -> Result<Option<CommitInfo>, ParseError> {
        let Some(header) = self.next_line()? else {
            return Ok(None);
        };

        let mut ids = self.strip_prefix(COMMIT_PREFIX, &header)?.split(' ');
        let sha1 = parse_sha1(ids.next().unwrap_or_default(), &header)?;
        let parent_sha1s = ids
            .map(|id| parse_sha1(id, &header))
            .collect::<Result<Vec<_>, _>>()?;

        let mut line = self.require_line()?;
        while line.starts_with(MERGE_PREFIX) {
            line = self.require_line()?;
        }
        let author = self.strip_prefix(AUTHOR_PREFIX, &line)?.trim().to_string();

        let line = self.require_line()?;
        let author_date = self.parse_timestamp(self.strip_prefix(AUTHOR_DATE_PREFIX, &line)?.trim())?;

        let line = self.require_line()?;
        let committer = self.strip_prefix(COMMITTER_PREFIX, &line)?.trim().to_string();

        let line = self.require_line()?;
        let commit_date = self.parse_timestamp(self.strip_prefix(COMMIT_DATE_PREFIX, &line)?.trim())?;

        let line = self.require_line()?;
        self.expect_blank(&line)?;

        let mut message_lines = Vec::new();
        match self.next_line()? {
            // Empty message: no message block and no closing blank line
            None => {}
            Some(line) if line.starts_with(COMMIT_PREFIX) => self.pending = Some(line),
            Some(first) => {
                let mut line = first;
                while let Some(text) = line.strip_prefix(MESSAGE_INDENT) {
                    message_lines.push(text.to_string());
                    line = self.require_line()?;
                }
                self.expect_blank(&line)?;
            }
        }

        tracing::trace!(sha1 = %sha1, lines = self.line_number, "parsed commit");

        Ok(Some(CommitInfo::new(
            sha1,
            parent_sha1s,
            author,
            author_date,
            committer,
            commit_date,
            message_lines,
        )))
    }
}

impl<R: BufRead> Iterator for RevList<R> {
    type Item = Result<CommitInfo, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.parse_commit() {
            Ok(Some(commit)) => Some(Ok(commit)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for RevList<R> {}

fn parse_sha1(id: &str, line: &str) -> Result<Sha1, ParseError> {
    Sha1::new(id).map_err(|source| ParseError::InvalidIdentifier {
        line: line.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const C1: &str = "1111111111111111111111111111111111111111";
    const C2: &str = "2222222222222222222222222222222222222222";
    const C3: &str = "3333333333333333333333333333333333333333";

    fn block(header: &str, message: &[&str]) -> String {
        let mut out = format!(
            "commit {header}\n\
             Author:     A U Thor <author@example.com>\n\
             AuthorDate: 2024-01-15T10:30:00+01:00\n\
             Commit:     C O Mitter <committer@example.com>\n\
             CommitDate: 2024-01-16T08:00:00-05:00\n\
             \n"
        );
        // git emits no message block for an empty message
        if !message.is_empty() {
            for line in message {
                out.push_str(&format!("    {line}\n"));
            }
            out.push('\n');
        }
        out
    }

    fn parse_all(output: &str) -> Result<Vec<CommitInfo>, ParseError> {
        parse_rev_list(output).collect()
    }

    #[test]
    fn single_commit_with_parent() {
        let output = block(&format!("{C2} {C1}"), &["line one", "line two"]);
        let commits = parse_all(&output).unwrap();

        assert_eq!(commits.len(), 1);
        let commit = &commits[0];
        assert_eq!(commit.sha1().as_str(), C2);
        assert_eq!(commit.parent_sha1s().len(), 1);
        assert_eq!(commit.parent_sha1s()[0].as_str(), C1);
        assert_eq!(commit.author(), "A U Thor <author@example.com>");
        assert_eq!(commit.committer(), "C O Mitter <committer@example.com>");
        assert_eq!(commit.message_lines(), ["line one", "line two"]);
        assert_eq!(commit.message(), "line one\nline two\n");
    }

    #[test]
    fn dates_keep_offsets() {
        let commits = parse_all(&block(C1, &["x"])).unwrap();
        let commit = &commits[0];

        assert_eq!(commit.author_date().to_rfc3339(), "2024-01-15T10:30:00+01:00");
        assert_eq!(commit.commit_date().offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn utc_z_suffix_accepted() {
        let output = block(C1, &["x"]).replace("+01:00", "Z");
        let commits = parse_all(&output).unwrap();
        assert_eq!(commits[0].author_date().offset().local_minus_utc(), 0);
    }

    #[test]
    fn root_commit_has_no_parents() {
        let commits = parse_all(&block(C1, &["root"])).unwrap();
        assert!(commits[0].parent_sha1s().is_empty());
    }

    #[test]
    fn consecutive_blocks() {
        let output = format!(
            "{}{}{}",
            block(&format!("{C3} {C2}"), &["third"]),
            block(&format!("{C2} {C1}"), &["second"]),
            block(C1, &["first"]),
        );
        let commits = parse_all(&output).unwrap();

        let ids: Vec<_> = commits.iter().map(|c| c.sha1().as_str()).collect();
        assert_eq!(ids, vec![C3, C2, C1]);
    }

    #[test]
    fn merge_lines_skipped() {
        let output = block(&format!("{C3} {C1} {C2}"), &["Merge branch 'x'"]).replace(
            "Author:",
            "Merge: 1111111 2222222\nAuthor:",
        );
        let commits = parse_all(&output).unwrap();

        assert_eq!(commits[0].parent_sha1s().len(), 2);
        assert_eq!(commits[0].message(), "Merge branch 'x'\n");
    }

    #[test]
    fn blank_message_lines_keep_paragraphs() {
        let output = block(C1, &["subject", "", "body"]);
        let commits = parse_all(&output).unwrap();
        assert_eq!(commits[0].message_lines(), ["subject", "", "body"]);
        assert_eq!(commits[0].message(), "subject\n\nbody\n");
    }

    #[test]
    fn empty_message() {
        let output = block(C1, &[]);
        assert!(output.ends_with("-05:00\n\n"));

        let commits = parse_all(&output).unwrap();
        assert_eq!(commits.len(), 1);
        assert!(commits[0].message_lines().is_empty());
        assert_eq!(commits[0].message(), "");
    }

    #[test]
    fn empty_message_followed_by_commit() {
        let output = format!(
            "{}{}{}",
            block(&format!("{C2} {C1}"), &[]),
            block(C1, &["Initial"]),
            block(C2, &[])
        );
        let mut parser = parse_rev_list(&output);

        let first = parser.next().unwrap().unwrap();
        assert_eq!(first.sha1().as_str(), C2);
        assert!(first.message_lines().is_empty());
        assert_eq!(parser.line_number(), 7);

        let second = parser.next().unwrap().unwrap();
        assert_eq!(second.sha1().as_str(), C1);
        assert_eq!(second.message_lines(), ["Initial"]);

        let third = parser.next().unwrap().unwrap();
        assert!(third.message_lines().is_empty());
        assert!(parser.next().is_none());
    }

    #[test]
    fn empty_message_then_garbage_is_fatal() {
        let output = format!("{}garbage\n", block(C1, &[]));
        assert!(matches!(
            parse_all(&output),
            Err(ParseError::ExpectedBlankLine { line, .. }) if line == "garbage"
        ));
    }

    #[test]
    fn extra_indent_is_kept() {
        let commits = parse_all(&block(C1, &["  nested"])).unwrap();
        assert_eq!(commits[0].message_lines(), ["  nested"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_all("").unwrap().is_empty());
    }

    #[test]
    fn truncated_after_author_date_is_fatal() {
        let full = block(C1, &["x"]);
        let truncated: String = full
            .lines()
            .take_while(|line| !line.starts_with("Commit:"))
            .map(|line| format!("{line}\n"))
            .collect();

        assert!(matches!(
            parse_all(&truncated),
            Err(ParseError::UnexpectedEnd { line_number: 3 })
        ));
    }

    #[test]
    fn missing_trailing_blank_is_fatal() {
        let output = block(C1, &["x"]);
        let output = output.strip_suffix('\n').unwrap();
        assert!(matches!(
            parse_all(output),
            Err(ParseError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn wrong_header_prefix_is_fatal() {
        let output = block(C1, &["x"]).replacen("commit ", "tree ", 1);
        assert!(matches!(
            parse_all(&output),
            Err(ParseError::UnexpectedLine { line_number: 1, expected: "commit ", .. })
        ));
    }

    #[test]
    fn unindented_line_after_message_is_fatal() {
        let output = block(C1, &["x"]).replace("    x\n", "    x\nnot indented\n");
        assert!(matches!(
            parse_all(&output),
            Err(ParseError::ExpectedBlankLine { line, .. }) if line == "not indented"
        ));
    }

    #[test]
    fn missing_blank_before_message_is_fatal() {
        let output = block(C1, &["x"]).replacen("\n\n", "\n", 1);
        assert!(matches!(
            parse_all(&output),
            Err(ParseError::ExpectedBlankLine { .. })
        ));
    }

    #[test]
    fn loose_timestamp_is_fatal() {
        let output = block(C1, &["x"]).replace("2024-01-15T10:30:00+01:00", "2024-01-15 10:30:00 +0100");
        assert!(matches!(
            parse_all(&output),
            Err(ParseError::InvalidTimestamp { line_number: 3, .. })
        ));
    }

    #[test]
    fn abbreviated_hash_is_fatal() {
        let output = block("1111111", &["x"]);
        assert!(matches!(
            parse_all(&output),
            Err(ParseError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn error_ends_iteration() {
        let output = format!("{}garbage\n{}", block(C2, &["ok"]), block(C1, &["never"]));
        let mut parser = parse_rev_list(&output);

        assert!(parser.next().unwrap().is_ok());
        assert!(parser.next().unwrap().is_err());
        assert!(parser.next().is_none());
    }

    #[test]
    fn stops_reading_when_dropped_early() {
        let output = format!("{}{}", block(C2, &["first"]), block(C1, &["second"]));
        let mut parser = parse_rev_list(&output);

        let first = parser.next().unwrap().unwrap();
        assert_eq!(first.sha1().as_str(), C2);
        assert_eq!(parser.line_number(), 8);
    }

    #[test]
    fn equality_ignores_message_cache() {
        let output = block(C1, &["x"]);
        let a = parse_all(&output).unwrap().remove(0);
        let b = parse_all(&output).unwrap().remove(0);
        let _ = a.message();
        assert_eq!(a, b);
    }
}
