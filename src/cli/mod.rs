//! cli
//!
//! Command-line interface layer for gitkit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and open the repository
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers convert arguments into strong types and
//! call [`crate::git::Git`] or the parsers in [`crate::core`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};
pub use commands::Context;

use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
