//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gitkit - Typed access to git refs, hashes and history
#[derive(Parser, Debug)]
#[command(name = "gitkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gitkit was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a string as a git identifier
    #[command(
        name = "check",
        long_about = "Validate a string as a git identifier.\n\n\
            Prints the value and exits with 0 if it is valid. Otherwise prints \
            the reason it was rejected and exits with 1.",
        after_help = "\
EXAMPLES:
    gitkit check sha1 0123456789abcdef0123456789abcdef01234567
    gitkit check ref-name refs/heads/main
    gitkit check ref-name-component feature/x    # fails: contains '/'
    gitkit check git-url https://example.com/org/project.git"
    )]
    Check {
        /// Identifier kind
        #[arg(value_enum)]
        kind: IdentifierKind,

        /// Value to validate
        value: String,
    },

    /// Parse git output read from stdin
    #[command(
        name = "parse",
        long_about = "Parse captured git output read from stdin.\n\n\
            `refs` accepts `git show-ref` / `git ls-remote` output and resolves \
            annotated tags to their commits. `log` accepts \
            `git rev-list --format=fuller --date=iso-strict` output, optionally \
            with `--parents`.",
        after_help = "\
EXAMPLES:
    git show-ref -d | gitkit parse refs
    git rev-list --parents --format=fuller --date=iso-strict HEAD | gitkit parse log --json"
    )]
    Parse {
        /// Output format to parse
        #[arg(value_enum)]
        format: ParseFormat,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List refs and the commits they point to
    #[command(
        name = "refs",
        after_help = "\
EXAMPLES:
    gitkit refs              # all local refs, including HEAD
    gitkit refs --heads      # local branches
    gitkit refs --remote --tags"
    )]
    Refs {
        /// List refs on the configured remote instead of local refs
        #[arg(long)]
        remote: bool,

        /// Only branches
        #[arg(long, conflicts_with = "tags")]
        heads: bool,

        /// Only tags
        #[arg(long)]
        tags: bool,

        /// Print refs as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show commit history
    #[command(
        name = "log",
        after_help = "\
EXAMPLES:
    gitkit log                 # history of HEAD
    gitkit log main -n 5
    gitkit log v1.0..HEAD --json"
    )]
    Log {
        /// Revision to list from (default: HEAD)
        rev: Option<String>,

        /// Maximum number of commits (default: repo config max_count)
        #[arg(short = 'n', long = "max-count")]
        max_count: Option<usize>,

        /// Print commits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a revision to a commit hash
    #[command(name = "rev-parse")]
    RevParse {
        /// Revision to resolve
        rev: String,

        /// Abbreviate the hash, to at least N digits if given
        #[arg(long, value_name = "N", num_args = 0..=1, require_equals = true)]
        short: Option<Option<usize>>,
    },

    /// Show the checked-out branch
    Branch,

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        after_help = "\
KEYS:
    git_program         Program to run for git commands (global)
    short_sha_length    Minimum abbreviated hash length (global)
    remote              Remote used by --remote listings (repo)
    max_count           Default commit count for `gitkit log` (repo)"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    gitkit completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    gitkit completion zsh >> ~/.zshrc"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Identifier kinds accepted by `check`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Rev,
    RefName,
    RefNameComponent,
    FullRefName,
    ShortSha1,
    Sha1,
    RepositoryName,
    GitUrl,
}

/// Output formats accepted by `parse`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFormat {
    /// `show-ref` / `ls-remote` output
    Refs,
    /// `rev-list --format=fuller --date=iso-strict` output
    Log,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
