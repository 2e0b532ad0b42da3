//! core::refs
//!
//! Ref records and the parser for `show-ref` / `ls-remote` output.
//!
//! # Input Shape
//!
//! One ref per line, hash first, separated from the name by a run of
//! whitespace:
//!
//! ```text
//! 08c471b4f1c4c1f1fcdd506bc291d1c3e7e383d8        refs/tags/1.7.0
//! 3c1a2b9d0e8f7a6b5c4d3e2f1a0b9c8d7e6f5a4b        refs/tags/1.7.0^{}
//! ```
//!
//! A `^{}` line names the commit an annotated tag points to. The parser folds
//! it into the tag's own entry so that every [`Ref`] targets a commit.
//!
//! # Example
//!
//! ```
//! use gitkit::core::refs::parse_refs;
//!
//! let output = "\
//! aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa refs/heads/main
//! bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb refs/tags/v1
//! cccccccccccccccccccccccccccccccccccccccc refs/tags/v1^{}
//! ";
//!
//! let refs = parse_refs(output).unwrap();
//! assert_eq!(refs.len(), 2);
//! assert_eq!(refs[1].full_name().as_str(), "refs/tags/v1");
//! assert_eq!(refs[1].target().as_str(), "cccccccccccccccccccccccccccccccccccccccc");
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::error::ParseError;
use super::types::{FullRefName, RefNameComponent, Sha1};

/// Suffix git appends to the synthetic entry for a peeled tag.
pub const DEREF_SUFFIX: &str = "^{}";

/// A fully-qualified ref name plus the commit it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Ref {
    full_name: FullRefName,
    short_name: RefNameComponent,
    target: Sha1,
    is_branch: bool,
    is_tag: bool,
}

impl Ref {
    /// Create a ref, deriving its short name and kind from `full_name`.
    pub fn new(full_name: FullRefName, target: Sha1) -> Self {
        Self {
            short_name: full_name.short_name(),
            is_branch: full_name.is_branch(),
            is_tag: full_name.is_tag(),
            full_name,
            target,
        }
    }

    pub fn full_name(&self) -> &FullRefName {
        &self.full_name
    }

    /// The last path component of the name.
    pub fn short_name(&self) -> &RefNameComponent {
        &self.short_name
    }

    pub fn target(&self) -> &Sha1 {
        &self.target
    }

    /// Whether the ref lives under `refs/heads/`.
    pub fn is_branch(&self) -> bool {
        self.is_branch
    }

    /// Whether the ref lives under `refs/tags/`.
    pub fn is_tag(&self) -> bool {
        self.is_tag
    }
}

/// One `<hash> <name>` line before dereference resolution.
struct RawEntry {
    line: String,
    name: String,
    target: Sha1,
}

/// Parse captured ref listing output.
///
/// See [`parse_ref_lines`].
pub fn parse_refs(output: &str) -> Result<Vec<Ref>, ParseError> {
    parse_ref_lines(output.lines())
}

/// Parse ref listing lines into refs, in input order.
///
/// Blank lines are skipped. A name with a matching `<name>^{}` entry resolves
/// to the dereferenced hash; `^{}` entries never produce a ref of their own.
///
/// # Errors
///
/// - [`ParseError::MalformedRefLine`] if a line is not exactly two fields
/// - [`ParseError::InvalidIdentifier`] if a hash or ref name is invalid
/// - [`ParseError::DuplicateRef`] if a name is listed twice
pub fn parse_ref_lines<I, S>(lines: I) -> Result<Vec<Ref>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut lookup: HashMap<String, Sha1> = HashMap::new();

    for raw in lines {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        let (hash, name) = split_entry(line).ok_or_else(|| ParseError::MalformedRefLine {
            line: line.to_string(),
        })?;
        let target = Sha1::new(hash).map_err(|source| ParseError::InvalidIdentifier {
            line: line.to_string(),
            source,
        })?;

        if lookup.insert(name.to_string(), target.clone()).is_some() {
            return Err(ParseError::DuplicateRef {
                name: name.to_string(),
            });
        }
        entries.push(RawEntry {
            line: line.to_string(),
            name: name.to_string(),
            target,
        });
    }

    let refs = entries
        .into_iter()
        .filter(|entry| !entry.name.ends_with(DEREF_SUFFIX))
        .map(|entry| {
            let full_name = FullRefName::new(entry.name.as_str()).map_err(|source| {
                ParseError::InvalidIdentifier {
                    line: entry.line.clone(),
                    source,
                }
            })?;
            let target = match lookup.remove(&format!("{}{}", entry.name, DEREF_SUFFIX)) {
                Some(peeled) => peeled,
                None => entry.target,
            };
            Ok(Ref::new(full_name, target))
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    tracing::trace!(count = refs.len(), "parsed ref listing");
    Ok(refs)
}

/// Split a trimmed line on its first whitespace run.
///
/// Returns `None` unless there are exactly two non-empty fields.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (hash, rest) = line.split_once(char::is_whitespace)?;
    let name = rest.trim();
    if hash.is_empty() || name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((hash, name))
}
