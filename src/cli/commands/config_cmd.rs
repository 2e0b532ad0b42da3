//! config command - Get, set, or list configuration values
//!
//! `git_program` and `short_sha_length` live in the global config;
//! `remote` and `max_count` live in the repo config.

use anyhow::{bail, Context as _, Result};

use crate::core::config::Config;
use crate::git::Git;
use crate::ui::output;

use super::Context;

/// Keys and the scope they are stored in.
const KEYS: [(&str, Scope); 4] = [
    ("git_program", Scope::Global),
    ("short_sha_length", Scope::Global),
    ("remote", Scope::Repo),
    ("max_count", Scope::Repo),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Global,
    Repo,
}

fn scope_of(key: &str) -> Result<Scope> {
    match KEYS.iter().find(|(name, _)| *name == key) {
        Some((_, scope)) => Ok(*scope),
        None => bail!("Unknown configuration key: {}", key),
    }
}

/// The effective value of `key`, or `None` if unset and without a default.
fn effective_value(config: &Config, key: &str) -> Result<Option<String>> {
    Ok(match key {
        "git_program" => Some(config.git_program().to_string()),
        "short_sha_length" => config.short_sha_length().map(|len| len.to_string()),
        "remote" => Some(config.remote().to_string()),
        "max_count" => config.max_count().map(|count| count.to_string()),
        _ => bail!("Unknown configuration key: {}", key),
    })
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("{} must be a positive integer, got '{}'", key, value))
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    scope_of(key)?;
    let config = ctx.load_config()?;

    if let Some(value) = effective_value(&config, key)? {
        output::line(value)?;
    }
    // Key exists but has no value - exit silently
    Ok(())
}

/// Set a configuration value.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let path = match scope_of(key)? {
        Scope::Global => {
            let mut global = ctx.load_config()?.global;
            match key {
                "git_program" => global.git_program = Some(value.to_string()),
                _ => global.short_sha_length = Some(parse_count(key, value)?),
            }
            Config::write_global(&global).context("Failed to write config")?
        }
        Scope::Repo => {
            let cwd = ctx.cwd()?;
            let git = Git::open(&cwd).context("Failed to open repository")?;
            let config = ctx.load_config()?;

            let mut repo = config.repo.unwrap_or_default();
            match key {
                "remote" => repo.remote = Some(value.to_string()),
                _ => repo.max_count = Some(parse_count(key, value)?),
            }
            let git_dir = git.git_dir().context("Failed to locate git directory")?;
            Config::write_repo(&git_dir, &repo).context("Failed to write config")?
        }
    };

    output::print(format!("Set {} = {}", key, value), ctx.verbosity());
    output::debug(format!("wrote {}", path.display()), ctx.verbosity());
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    for (key, scope) in KEYS {
        let value = effective_value(&config, key)?.unwrap_or_else(|| "(not set)".to_string());
        let scope = match scope {
            Scope::Global => "global",
            Scope::Repo => "repo",
        };
        output::line(format_args!("{} = {}  # {}", key, value, scope))?;
    }

    Ok(())
}
