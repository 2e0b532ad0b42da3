//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Converts its arguments into strong types
//! 2. Calls the repository facade or a parser
//! 3. Formats and displays output
//!
//! `check`, `parse` and `completion` work without a repository.

mod branch;
mod check;
mod completion;
mod config_cmd;
mod log_cmd;
mod parse;
mod refs;
mod rev_parse;

// Re-export command functions for testing and direct invocation
pub use branch::branch;
pub use check::check;
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use log_cmd::log;
pub use parse::parse;
pub use refs::refs;
pub use rev_parse::rev_parse;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::git::{Git, GitRunner};
use crate::ui::output::{self, Verbosity};

/// Settings shared by every command, taken from global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Output verbosity implied by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// The directory commands run in.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    /// Load configuration without requiring a repository.
    ///
    /// Repo config is included when the working directory is inside one.
    pub fn load_config(&self) -> Result<Config> {
        let cwd = self.cwd()?;
        let git_dir = match Git::find_containing_repository(&cwd).ok().flatten() {
            Some(git) => Some(git.git_dir().context("Failed to locate git directory")?),
            None => None,
        };
        self.load_config_at(git_dir.as_deref())
    }

    fn load_config_at(&self, git_dir: Option<&std::path::Path>) -> Result<Config> {
        let result = Config::load(git_dir).context("Failed to load config")?;
        for warning in &result.warnings {
            output::warn(
                format!("{} ({})", warning.message, warning.path.display()),
                self.verbosity(),
            );
        }
        if let Some(path) = result.config.global_config_loaded_from() {
            output::debug(format!("global config: {}", path.display()), self.verbosity());
        }
        if let Some(path) = result.config.repo_config_loaded_from() {
            output::debug(format!("repo config: {}", path.display()), self.verbosity());
        }
        Ok(result.config)
    }

    /// Open the repository containing the working directory, with its config.
    pub fn open_repo(&self) -> Result<(Git, Config)> {
        let cwd = self.cwd()?;
        let git = Git::open(&cwd).context("Failed to open repository")?;
        let git_dir = git.git_dir().context("Failed to locate git directory")?;
        let config = self.load_config_at(Some(&git_dir))?;

        output::debug(
            format!("repository {} at {}", git.name(), git.path().display()),
            self.verbosity(),
        );

        let git = git.with_runner(GitRunner::new(config.git_program()));
        Ok((git, config))
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Check { kind, value } => check::check(ctx, kind, &value),
        Command::Parse { format, json } => parse::parse(ctx, format, json),
        Command::Refs {
            remote,
            heads,
            tags,
            json,
        } => refs::refs(ctx, remote, heads, tags, json),
        Command::Log {
            rev,
            max_count,
            json,
        } => log_cmd::log(ctx, rev.as_deref(), max_count, json),
        Command::RevParse { rev, short } => rev_parse::rev_parse(ctx, &rev, short),
        Command::Branch => branch::branch(ctx),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}
