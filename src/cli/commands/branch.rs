//! branch command - Show the checked-out branch

use anyhow::{Context as _, Result};

use crate::ui::output;

use super::Context;

/// Print the current branch name. Prints nothing on a detached HEAD.
pub fn branch(ctx: &Context) -> Result<()> {
    let (git, _config) = ctx.open_repo()?;

    match git
        .current_branch()
        .context("Failed to determine current branch")?
    {
        Some(name) => output::line(name)?,
        None => output::warn("HEAD is detached", ctx.verbosity()),
    }
    Ok(())
}
