//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. Every command is run by
//! [`GitRunner`]; no other module spawns processes. The [`Git`] facade builds
//! command lines from strong types and hands output to the parsers in
//! [`crate::core`].
//!
//! # Responsibilities
//!
//! - Repository discovery, creation and cloning
//! - Rev resolution (full and abbreviated hashes)
//! - Branch, tag and symbolic ref listing and mutation
//! - Working tree status, staging, committing, checkout
//! - Streaming commit history
//!
//! # Invariants
//!
//! - All operations take and return strong types (Sha1, RefNameComponent, FullRefName)
//! - Every failure carries the command line and git's output
//!
//! # Example
//!
//! ```no_run
//! use gitkit::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for tag in git.tags()? {
//!     println!("{} {}", tag.target(), tag.short_name());
//! }
//! # Ok::<(), gitkit::git::GitError>(())
//! ```

mod interface;
mod runner;

pub use interface::{Git, GitError, RevListStream};
pub use runner::{CommandOutput, GitRunner, LineStream};
