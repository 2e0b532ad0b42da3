//! refs command - List refs and the commits they point to

use anyhow::{Context as _, Result};

use crate::core::refs::Ref;
use crate::ui::output;

use super::Context;

/// List local or remote refs.
pub fn refs(ctx: &Context, remote: bool, heads: bool, tags: bool, json: bool) -> Result<()> {
    let (git, config) = ctx.open_repo()?;

    let refs = if remote {
        let remote = config.remote();
        output::debug(format!("listing refs on {}", remote), ctx.verbosity());
        if heads {
            git.remote_branches(remote)
        } else if tags {
            git.remote_tags(remote)
        } else {
            git.remote_refs(remote)
        }
    } else if heads {
        git.branches()
    } else if tags {
        git.tags()
    } else {
        git.refs()
    }
    .context("Failed to list refs")?;

    print_refs(&refs, json)
}

/// Print refs as `<target> <full name>` lines, or as JSON.
pub(super) fn print_refs(refs: &[Ref], json: bool) -> Result<()> {
    if json {
        output::json(refs)?;
        return Ok(());
    }

    for r in refs {
        output::line(format_args!("{} {}", r.target(), r.full_name()))?;
    }
    Ok(())
}
