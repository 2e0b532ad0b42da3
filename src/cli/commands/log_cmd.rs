//! log command - Show commit history
//!
//! Streams `rev-list` output, so `-n` and early exit never make git walk
//! more history than is printed.

use std::io;

use anyhow::{Context as _, Result};

use crate::core::rev_list::CommitInfo;
use crate::core::types::Rev;
use crate::ui::output;

use super::Context;

/// Abbreviation used for hashes in one-line output.
const SHORT_LEN: usize = 7;

/// Show history reachable from `rev` (default `HEAD`).
pub fn log(ctx: &Context, rev: Option<&str>, max_count: Option<usize>, json: bool) -> Result<()> {
    let (git, config) = ctx.open_repo()?;

    let rev = match rev {
        Some(rev) => Rev::new(rev).context("Invalid revision")?,
        None => Rev::head(),
    };
    let max_count = max_count.or(config.max_count());
    output::debug(
        format!("rev-list {} (max {:?})", rev, max_count),
        ctx.verbosity(),
    );

    let commits = git
        .rev_list(&rev, max_count)
        .context("Failed to start rev-list")?;

    if json {
        let commits = commits
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read history")?;
        output::json(&commits)?;
        return Ok(());
    }

    for commit in commits {
        let commit = commit.context("Failed to read history")?;
        print_commit(&commit)?;
    }
    Ok(())
}

/// Print a commit as `<short hash> <subject>`.
pub(super) fn print_commit(commit: &CommitInfo) -> io::Result<()> {
    let subject = commit
        .message_lines()
        .first()
        .map(String::as_str)
        .unwrap_or_default();
    output::line(format_args!("{} {}", commit.sha1().short(SHORT_LEN), subject))?;
    Ok(())
}
