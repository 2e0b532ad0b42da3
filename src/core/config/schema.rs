//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$GITKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitkit/config.toml`
//! 3. `~/.gitkit/config.toml` (canonical write location)
//!
//! # Repo Config
//!
//! Located at `gitkit/config.toml` in the common git directory.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the remote must be a
//! valid ref name component).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{RefNameComponent, Sha1, ShortSha1};

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// git_program = "/usr/local/bin/git"
/// short_sha_length = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Program to run for git commands
    pub git_program: Option<String>,

    /// Minimum length for abbreviated hashes
    pub short_sha_length: Option<usize>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(program) = &self.git_program {
            if program.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "git_program cannot be empty".to_string(),
                ));
            }
        }

        if let Some(len) = self.short_sha_length {
            if !(ShortSha1::MIN_LEN..=Sha1::LEN).contains(&len) {
                return Err(ConfigError::InvalidValue(format!(
                    "short_sha_length must be between {} and {}, got {}",
                    ShortSha1::MIN_LEN,
                    Sha1::LEN,
                    len
                )));
            }
        }

        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// remote = "upstream"
/// max_count = 50
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Remote name (default: "origin")
    pub remote: Option<String>,

    /// Default number of commits shown by `gitkit log`
    pub max_count: Option<usize>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            RefNameComponent::new(remote.as_str())
                .map_err(|e| ConfigError::InvalidValue(format!("invalid remote: {}", e)))?;
        }

        if self.max_count == Some(0) {
            return Err(ConfigError::InvalidValue(
                "max_count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
