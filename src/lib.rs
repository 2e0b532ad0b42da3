//! gitkit - A typed access layer over the git command line
//!
//! gitkit validates identifier strings (hashes, ref names, repository names,
//! URLs) into distinct types, runs the `git` executable, and parses its text
//! output into structured records.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`core`] - Identifier types, output parsers, configuration
//! - [`git`] - Process invocation and the repository facade
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - Terminal output utilities
//!
//! # Correctness Invariants
//!
//! 1. An identifier value always satisfies its type's grammar
//! 2. A ref always targets a full commit hash, never an annotated tag object
//! 3. Truncated or misshapen git output is an error, never a short result
//!
//! # Example
//!
//! ```no_run
//! use gitkit::core::types::Rev;
//! use gitkit::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for commit in git.rev_list(&Rev::head(), Some(10))? {
//!     let commit = commit?;
//!     println!("{} {}", commit.sha1().short(7), commit.message_lines()[0]);
//! }
//! # Ok::<(), gitkit::git::GitError>(())
//! ```

pub mod cli;
pub mod core;
pub mod git;
pub mod ui;
