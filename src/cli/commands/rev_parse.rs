//! rev-parse command - Resolve a revision to a commit hash

use anyhow::{Context as _, Result};

use crate::core::types::Rev;
use crate::ui::output;

use super::Context;

/// Resolve `rev` and print its full or abbreviated hash.
///
/// `short` is `None` for a full hash, `Some(None)` to abbreviate to the
/// configured (or git's automatic) length, `Some(Some(n))` for at least `n`.
pub fn rev_parse(ctx: &Context, rev: &str, short: Option<Option<usize>>) -> Result<()> {
    let (git, config) = ctx.open_repo()?;
    let rev = Rev::new(rev).context("Invalid revision")?;

    match short {
        None => {
            let sha1 = git
                .commit_id(&rev)
                .with_context(|| format!("Failed to resolve '{}'", rev))?;
            output::line(sha1)?;
        }
        Some(len) => {
            let short = git
                .short_commit_id(&rev, len.or(config.short_sha_length()))
                .with_context(|| format!("Failed to resolve '{}'", rev))?;
            output::line(short)?;
        }
    }
    Ok(())
}
