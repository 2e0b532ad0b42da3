//! core
//!
//! Core domain types and output parsers for gitkit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Rev, RefName, Sha1, RepositoryName, GitUrl
//! - [`refs`] - Ref records and the ref listing parser
//! - [`rev_list`] - Commit records and the streaming history parser
//! - [`error`] - Parse errors shared by both parsers
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid identifiers from reaching git
//! - Parsers are pure: they never spawn processes or touch the filesystem
//! - A parse either fully succeeds or fails at the first violation

pub mod config;
pub mod error;
pub mod refs;
pub mod rev_list;
pub mod types;

pub use error::ParseError;
