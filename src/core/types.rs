//! core::types
//!
//! Strong types for git identifiers.
//!
//! # Types
//!
//! - [`Rev`] - Anything that names a commit (`HEAD~2`, `main`, a hash, ...)
//! - [`RefName`] - A possibly-partial ref path (`main`, `heads/main`, `refs/heads/main`)
//! - [`RefNameComponent`] - A single ref path segment (`main`)
//! - [`FullRefName`] - A fully-qualified ref path (`refs/heads/main`)
//! - [`ShortSha1`] - A possibly-abbreviated object hash (4 to 40 hex digits)
//! - [`Sha1`] - A full 40 digit object hash
//! - [`RepositoryName`] - A repository name, compared case-insensitively
//! - [`GitUrl`] - A fetchable repository URL
//!
//! # Validation
//!
//! Construction is the only place validation happens. Every type runs its own
//! grammar check against the raw string, so a [`Sha1`] can be built straight
//! from command output without going through [`Rev`] first. Widening
//! conversions (`Sha1` into `ShortSha1`, `RefNameComponent` into `RefName`,
//! ...) are infallible `From` impls; narrowing conversions are `TryFrom` impls
//! that re-run the stricter grammar.
//!
//! # Examples
//!
//! ```
//! use gitkit::core::types::{RefName, RefNameComponent, Rev, Sha1};
//!
//! let sha = Sha1::new("0123456789abcdef0123456789abcdef01234567").unwrap();
//! let rev: Rev = sha.into();
//! assert_eq!(rev.as_str(), "0123456789abcdef0123456789abcdef01234567");
//!
//! let name = RefName::new("refs/heads/main").unwrap();
//! assert!(RefNameComponent::try_from(name).is_err());
//!
//! assert!(Sha1::new("0123").is_err());
//! assert!(RefName::new("a//b").is_err());
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Why a string was rejected by an identifier grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatReason {
    Empty,
    WhitespaceOnly,
    InvalidCharacters,
    StartsWithSeparator,
    EndsWithSeparator,
    ConsecutiveSeparators,
    TooShort,
    TooLong,
    InvalidUrl,
    InvalidScheme,
    QueryNotPermitted,
    FragmentNotPermitted,
}

impl FormatReason {
    /// Human-readable description of the reason.
    pub fn description(&self) -> &'static str {
        match self {
            FormatReason::Empty => "Empty",
            FormatReason::WhitespaceOnly => "Whitespace-only",
            FormatReason::InvalidCharacters => "Contains invalid characters",
            FormatReason::StartsWithSeparator => "Starts with path separator",
            FormatReason::EndsWithSeparator => "Ends with path separator",
            FormatReason::ConsecutiveSeparators => "Multiple consecutive path separators",
            FormatReason::TooShort => "Too short",
            FormatReason::TooLong => "Too long",
            FormatReason::InvalidUrl => "Not an absolute URL",
            FormatReason::InvalidScheme => "Invalid Git URL scheme",
            FormatReason::QueryNotPermitted => "Query components are not permitted in Git URLs",
            FormatReason::FragmentNotPermitted => {
                "Fragment components are not permitted in Git URLs"
            }
        }
    }
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A string failed an identifier grammar check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}': {reason}")]
pub struct FormatError {
    /// Which identifier kind was being constructed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
    /// Why it was rejected
    pub reason: FormatReason,
}

impl FormatError {
    fn new(kind: &'static str, value: &str, reason: FormatReason) -> Self {
        Self {
            kind,
            value: value.to_string(),
            reason,
        }
    }
}

/// Implemented by every identifier that can name a commit.
///
/// Repository operations take `&impl Revision` so that any of [`Rev`],
/// [`RefName`], [`RefNameComponent`], [`FullRefName`], [`ShortSha1`] or
/// [`Sha1`] can be passed without converting first.
pub trait Revision: fmt::Display {
    /// The revision expression as handed to git.
    fn as_rev(&self) -> &str;
}

// =============================================================================
// Grammar checks
// =============================================================================

fn check_rev(kind: &'static str, value: &str) -> Result<(), FormatError> {
    if value.is_empty() {
        return Err(FormatError::new(kind, value, FormatReason::Empty));
    }
    if value.trim().is_empty() {
        return Err(FormatError::new(kind, value, FormatReason::WhitespaceOnly));
    }
    Ok(())
}

fn is_ref_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '.' | '-')
}

fn check_ref_name(kind: &'static str, value: &str) -> Result<(), FormatError> {
    check_rev(kind, value)?;

    if !value.chars().all(is_ref_char) {
        return Err(FormatError::new(kind, value, FormatReason::InvalidCharacters));
    }
    if value.starts_with('/') {
        return Err(FormatError::new(kind, value, FormatReason::StartsWithSeparator));
    }
    if value.ends_with('/') {
        return Err(FormatError::new(kind, value, FormatReason::EndsWithSeparator));
    }
    if value.contains("//") {
        return Err(FormatError::new(
            kind,
            value,
            FormatReason::ConsecutiveSeparators,
        ));
    }
    Ok(())
}

fn check_ref_name_component(kind: &'static str, value: &str) -> Result<(), FormatError> {
    check_ref_name(kind, value)?;
    if value.contains('/') {
        return Err(FormatError::new(kind, value, FormatReason::InvalidCharacters));
    }
    Ok(())
}

fn is_lower_hex(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f')
}

fn check_short_sha1(kind: &'static str, value: &str) -> Result<(), FormatError> {
    check_rev(kind, value)?;

    if value.len() < ShortSha1::MIN_LEN {
        return Err(FormatError::new(kind, value, FormatReason::TooShort));
    }
    if value.len() > Sha1::LEN {
        return Err(FormatError::new(kind, value, FormatReason::TooLong));
    }
    if !value.chars().all(is_lower_hex) {
        return Err(FormatError::new(kind, value, FormatReason::InvalidCharacters));
    }
    Ok(())
}

fn check_sha1(kind: &'static str, value: &str) -> Result<(), FormatError> {
    check_short_sha1(kind, value)?;
    if value.len() < Sha1::LEN {
        return Err(FormatError::new(kind, value, FormatReason::TooShort));
    }
    Ok(())
}

fn check_repository_name(kind: &'static str, value: &str) -> Result<(), FormatError> {
    if value.is_empty() {
        return Err(FormatError::new(kind, value, FormatReason::Empty));
    }
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !valid {
        return Err(FormatError::new(kind, value, FormatReason::InvalidCharacters));
    }
    Ok(())
}

// =============================================================================
// Revision types
// =============================================================================

/// Declares a validated string wrapper that names a commit.
macro_rules! revision_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $check:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Name of this identifier kind, as used in error messages.
            pub const KIND: &'static str = $kind;

            /// Validate and wrap a string.
            ///
            /// # Errors
            ///
            /// Returns [`FormatError`] if the string violates this type's grammar.
            pub fn new(value: impl Into<String>) -> Result<Self, FormatError> {
                let value = value.into();
                $check(Self::KIND, &value)?;
                Ok(Self(value))
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Unwrap into the underlying string.
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl Revision for $name {
            fn as_rev(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = FormatError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = FormatError;

            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl FromStr for $name {
            type Err = FormatError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

/// Declares an infallible widening conversion between revision types.
macro_rules! widen {
    ($from:ident => $to:ident) => {
        impl From<$from> for $to {
            fn from(value: $from) -> Self {
                $to(value.0)
            }
        }
    };
}

/// Declares a fallible narrowing conversion that re-runs the stricter grammar.
macro_rules! narrow {
    ($from:ident => $to:ident) => {
        impl TryFrom<$from> for $to {
            type Error = FormatError;

            fn try_from(value: $from) -> Result<Self, Self::Error> {
                $to::new(value.0)
            }
        }
    };
}

revision_type!(
    /// A string that specifies a particular commit in any way.
    ///
    /// Any non-empty string that is not only whitespace: `HEAD`, `main~3`,
    /// `v1.0^{commit}`, `a..b`. Git decides what it means.
    ///
    /// # Example
    ///
    /// ```
    /// use gitkit::core::types::Rev;
    ///
    /// assert!(Rev::new("HEAD~2").is_ok());
    /// assert!(Rev::new("").is_err());
    /// assert!(Rev::new("   ").is_err());
    /// ```
    Rev,
    "rev",
    check_rev
);

revision_type!(
    /// A refname.
    ///
    /// May be a full path, a partial path or a single component, and may be
    /// ambiguous. Restricted to `[A-Za-z0-9/_.-]`, with no leading, trailing
    /// or doubled `/`.
    ///
    /// # Example
    ///
    /// ```
    /// use gitkit::core::types::RefName;
    ///
    /// assert!(RefName::new("heads/feature-1").is_ok());
    /// assert!(RefName::new("/heads").is_err());
    /// assert!(RefName::new("heads/").is_err());
    /// assert!(RefName::new("has space").is_err());
    /// ```
    RefName,
    "ref name",
    check_ref_name
);

revision_type!(
    /// A single refname path component, such as a branch or tag name.
    ///
    /// # Example
    ///
    /// ```
    /// use gitkit::core::types::RefNameComponent;
    ///
    /// assert!(RefNameComponent::new("main").is_ok());
    /// assert!(RefNameComponent::new("feature/x").is_err());
    /// ```
    RefNameComponent,
    "ref name component",
    check_ref_name_component
);

revision_type!(
    /// A full, unambiguous refname path such as `refs/heads/main`.
    ///
    /// Uses the [`RefName`] grammar. The separate type lets signatures demand
    /// an already-qualified name.
    FullRefName,
    "full ref name",
    check_ref_name
);

revision_type!(
    /// A possibly-shortened hexadecimal sha1 object name (4 to 40 lowercase hex digits).
    ShortSha1,
    "short sha1",
    check_short_sha1
);

revision_type!(
    /// A full 40 character lowercase hexadecimal sha1 object name.
    ///
    /// # Example
    ///
    /// ```
    /// use gitkit::core::types::Sha1;
    ///
    /// let sha = Sha1::new("abc123def4567890abc123def4567890abc12345").unwrap();
    /// assert_eq!(sha.short(7), "abc123d");
    ///
    /// assert!(Sha1::new("ABC123DEF4567890ABC123DEF4567890ABC12345").is_err());
    /// assert!(Sha1::new("abc123").is_err());
    /// ```
    Sha1,
    "sha1",
    check_sha1
);

widen!(RefName => Rev);
widen!(RefNameComponent => Rev);
widen!(RefNameComponent => RefName);
widen!(FullRefName => Rev);
widen!(FullRefName => RefName);
widen!(ShortSha1 => Rev);
widen!(Sha1 => Rev);
widen!(Sha1 => ShortSha1);

narrow!(Rev => RefName);
narrow!(Rev => RefNameComponent);
narrow!(Rev => ShortSha1);
narrow!(Rev => Sha1);
narrow!(RefName => RefNameComponent);
narrow!(ShortSha1 => Sha1);

impl Rev {
    /// The currently checked-out commit.
    pub fn head() -> Self {
        Self("HEAD".to_string())
    }

    /// The `<from>..<to>` range expression.
    pub fn range(from: &impl Revision, to: &impl Revision) -> Self {
        Self(format!("{}..{}", from.as_rev(), to.as_rev()))
    }

    /// The `<rev>^{commit}` expression, which peels tags down to a commit.
    pub fn peel_to_commit(rev: &impl Revision) -> Self {
        Self(format!("{}^{{commit}}", rev.as_rev()))
    }
}

impl RefName {
    /// The path components of the name.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl FullRefName {
    /// Prefix of local branch refs.
    pub const HEADS_PREFIX: &'static str = "refs/heads/";

    /// Prefix of tag refs.
    pub const TAGS_PREFIX: &'static str = "refs/tags/";

    /// The `HEAD` pseudo-ref.
    pub fn head() -> Self {
        Self("HEAD".to_string())
    }

    /// The ref for a local branch (`refs/heads/<name>`).
    ///
    /// # Example
    ///
    /// ```
    /// use gitkit::core::types::{FullRefName, RefNameComponent};
    ///
    /// let name = RefNameComponent::new("main").unwrap();
    /// assert_eq!(FullRefName::for_branch(&name).as_str(), "refs/heads/main");
    /// ```
    pub fn for_branch(name: &RefNameComponent) -> Self {
        // A valid component under a valid prefix is a valid ref name
        Self(format!("{}{}", Self::HEADS_PREFIX, name.as_str()))
    }

    /// The ref for a tag (`refs/tags/<name>`).
    pub fn for_tag(name: &RefNameComponent) -> Self {
        Self(format!("{}{}", Self::TAGS_PREFIX, name.as_str()))
    }

    /// Whether this is a local branch ref.
    pub fn is_branch(&self) -> bool {
        self.0.starts_with(Self::HEADS_PREFIX)
    }

    /// Whether this is a tag ref.
    pub fn is_tag(&self) -> bool {
        self.0.starts_with(Self::TAGS_PREFIX)
    }

    /// The last path component (`main` for `refs/heads/main`).
    pub fn short_name(&self) -> RefNameComponent {
        // Components of a valid ref name are non-empty and slash-free
        let last = self.0.rsplit('/').next().unwrap_or(&self.0);
        RefNameComponent(last.to_string())
    }

    /// Strip a prefix from the name and return the remainder.
    pub fn strip_prefix(&self, prefix: &str) -> Option<&str> {
        self.0.strip_prefix(prefix)
    }
}

impl ShortSha1 {
    /// Fewest hex digits git accepts as an abbreviation.
    pub const MIN_LEN: usize = 4;
}

impl Sha1 {
    /// Number of hex digits in a full sha1.
    pub const LEN: usize = 40;

    /// Get the first `len` characters.
    ///
    /// Returns the full hash if `len` exceeds its length.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }
}

// =============================================================================
// RepositoryName
// =============================================================================

/// A git repository name, as found in the last component of a URL or path.
///
/// Restricted to `[A-Za-z0-9_.-]`. Equality and hashing ignore case.
///
/// # Example
///
/// ```
/// use gitkit::core::types::RepositoryName;
///
/// let a = RepositoryName::new("MyRepo").unwrap();
/// let b = RepositoryName::new("myrepo").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "MyRepo");
///
/// assert!(RepositoryName::new("my repo").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Name of this identifier kind, as used in error messages.
    pub const KIND: &'static str = "repository name";

    /// Validate and wrap a repository name.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the name is empty or contains characters
    /// outside `[A-Za-z0-9_.-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, FormatError> {
        let value = value.into();
        check_repository_name(Self::KIND, &value)?;
        Ok(Self(value))
    }

    /// Get the name as a string slice, with its original case.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for RepositoryName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for RepositoryName {}

impl Hash for RepositoryName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_uppercase().hash(state);
    }
}

impl TryFrom<String> for RepositoryName {
    type Error = FormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl FromStr for RepositoryName {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<RepositoryName> for String {
    fn from(name: RepositoryName) -> Self {
        name.0
    }
}

impl AsRef<str> for RepositoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// GitUrl
// =============================================================================

/// A git repository URL.
///
/// Must be absolute, use one of the `file`, `ssh`, `git`, `http` or `https`
/// schemes, and carry no query or fragment. See `git help fetch`.
///
/// # Example
///
/// ```
/// use gitkit::core::types::GitUrl;
///
/// let url = GitUrl::new("https://example.com/org/project.git").unwrap();
/// assert_eq!(url.repository_name().as_str(), "project");
///
/// assert!(GitUrl::new("ftp://example.com/project.git").is_err());
/// assert!(GitUrl::new("https://example.com/project.git?x=1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GitUrl {
    url: Url,
    repository_name: RepositoryName,
}

impl GitUrl {
    /// Name of this identifier kind, as used in error messages.
    pub const KIND: &'static str = "git url";

    const SCHEMES: [&'static str; 5] = ["file", "ssh", "git", "http", "https"];

    /// Parse and validate a git URL.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if the URL is relative or malformed, uses an
    /// unsupported scheme, has a query or fragment, or its final path
    /// component is not a valid [`RepositoryName`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, FormatError> {
        let value = value.as_ref();
        let url = Url::parse(value)
            .map_err(|_| FormatError::new(Self::KIND, value, FormatReason::InvalidUrl))?;

        // Url lowercases the scheme
        if !Self::SCHEMES.contains(&url.scheme()) {
            return Err(FormatError::new(
                Self::KIND,
                value,
                FormatReason::InvalidScheme,
            ));
        }
        if url.query().is_some() {
            return Err(FormatError::new(
                Self::KIND,
                value,
                FormatReason::QueryNotPermitted,
            ));
        }
        if url.fragment().is_some() {
            return Err(FormatError::new(
                Self::KIND,
                value,
                FormatReason::FragmentNotPermitted,
            ));
        }

        let file_name = url.path().rsplit('/').next().unwrap_or_default();
        let stem = match file_name.rsplit_once('.') {
            Some((stem, _extension)) => stem,
            None => file_name,
        };
        let repository_name = RepositoryName::new(stem)?;

        Ok(Self {
            url,
            repository_name,
        })
    }

    /// The final path component, minus any extension.
    pub fn repository_name(&self) -> &RepositoryName {
        &self.repository_name
    }

    /// The parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Get the URL as a string slice.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl TryFrom<String> for GitUrl {
    type Error = FormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl FromStr for GitUrl {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<GitUrl> for String {
    fn from(url: GitUrl) -> Self {
        url.url.into()
    }
}

impl AsRef<str> for GitUrl {
    fn as_ref(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const SHA: &str = "abc123def4567890abc123def4567890abc12345";

    fn reason<T: fmt::Debug>(result: Result<T, FormatError>) -> FormatReason {
        result.unwrap_err().reason
    }

    mod rev {
        use super::*;

        #[test]
        fn valid_revs() {
            assert!(Rev::new("HEAD").is_ok());
            assert!(Rev::new("main~3").is_ok());
            assert!(Rev::new("v1.0^{commit}").is_ok());
            assert!(Rev::new("a..b").is_ok());
            assert!(Rev::new(" padded ").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert_eq!(reason(Rev::new("")), FormatReason::Empty);
        }

        #[test]
        fn whitespace_only_rejected() {
            assert_eq!(reason(Rev::new(" \t ")), FormatReason::WhitespaceOnly);
        }

        #[test]
        fn range_and_peel() {
            let from = RefNameComponent::new("main").unwrap();
            let to = Sha1::new(SHA).unwrap();
            assert_eq!(Rev::range(&from, &to).as_str(), format!("main..{SHA}"));
            assert_eq!(Rev::peel_to_commit(&from).as_str(), "main^{commit}");
        }

        #[test]
        fn narrowing_reruns_grammar() {
            let rev = Rev::new("HEAD~1").unwrap();
            assert_eq!(
                reason(RefName::try_from(rev)),
                FormatReason::InvalidCharacters
            );

            let rev = Rev::new(SHA).unwrap();
            assert!(Sha1::try_from(rev).is_ok());
        }
    }

    mod ref_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(RefName::new("main").is_ok());
            assert!(RefName::new("refs/heads/main").is_ok());
            assert!(RefName::new("refs/tags/v1.2.3").is_ok());
            assert!(RefName::new("feature_x-1").is_ok());
            assert!(RefName::new("HEAD").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert_eq!(reason(RefName::new("")), FormatReason::Empty);
        }

        #[test]
        fn invalid_characters_rejected() {
            for bad in ["has space", "a~1", "a^", "a:b", "a@{1}", "tab\there", "é"] {
                assert_eq!(
                    reason(RefName::new(bad)),
                    FormatReason::InvalidCharacters,
                    "{bad}"
                );
            }
        }

        #[test]
        fn separator_rules() {
            assert_eq!(
                reason(RefName::new("/refs")),
                FormatReason::StartsWithSeparator
            );
            assert_eq!(
                reason(RefName::new("refs/")),
                FormatReason::EndsWithSeparator
            );
            assert_eq!(
                reason(RefName::new("refs//heads")),
                FormatReason::ConsecutiveSeparators
            );
        }

        #[test]
        fn components() {
            let name = RefName::new("refs/heads/main").unwrap();
            assert_eq!(
                name.components().collect::<Vec<_>>(),
                vec!["refs", "heads", "main"]
            );
        }

        #[test]
        fn error_message_carries_reason() {
            let err = RefName::new("a//b").unwrap_err();
            assert_eq!(
                err.to_string(),
                "invalid ref name 'a//b': Multiple consecutive path separators"
            );
        }

        #[test]
        fn serde_roundtrip() {
            let name = RefName::new("refs/heads/main").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"refs/heads/main\"");
            let parsed: RefName = serde_json::from_str(&json).unwrap();
            assert_eq!(name, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            assert!(serde_json::from_str::<RefName>("\"a//b\"").is_err());
        }
    }

    mod ref_name_component {
        use super::*;

        #[test]
        fn valid_components() {
            assert!(RefNameComponent::new("main").is_ok());
            assert!(RefNameComponent::new("v1.0").is_ok());
        }

        #[test]
        fn slash_rejected() {
            assert_eq!(
                reason(RefNameComponent::new("feature/x")),
                FormatReason::InvalidCharacters
            );
        }

        #[test]
        fn inherits_ref_name_rules() {
            assert_eq!(reason(RefNameComponent::new("")), FormatReason::Empty);
            assert_eq!(
                reason(RefNameComponent::new("/x")),
                FormatReason::StartsWithSeparator
            );
        }

        #[test]
        fn widening_and_narrowing() {
            let component = RefNameComponent::new("main").unwrap();
            let name: RefName = component.clone().into();
            assert_eq!(name.as_str(), "main");
            assert_eq!(RefNameComponent::try_from(name).unwrap(), component);

            let nested = RefName::new("a/b").unwrap();
            assert!(RefNameComponent::try_from(nested).is_err());
        }
    }

    mod full_ref_name {
        use super::*;

        #[test]
        fn branch_and_tag_refs() {
            let name = RefNameComponent::new("v1").unwrap();

            let branch = FullRefName::for_branch(&name);
            assert_eq!(branch.as_str(), "refs/heads/v1");
            assert!(branch.is_branch());
            assert!(!branch.is_tag());

            let tag = FullRefName::for_tag(&name);
            assert_eq!(tag.as_str(), "refs/tags/v1");
            assert!(tag.is_tag());
            assert!(!tag.is_branch());
        }

        #[test]
        fn short_name_is_last_component() {
            let name = FullRefName::new("refs/remotes/origin/main").unwrap();
            assert_eq!(name.short_name().as_str(), "main");
            assert_eq!(FullRefName::head().short_name().as_str(), "HEAD");
        }

        #[test]
        fn same_grammar_as_ref_name() {
            assert!(FullRefName::new("refs/heads/main").is_ok());
            assert!(FullRefName::new("refs//heads").is_err());
        }

        #[test]
        fn strip_prefix() {
            let name = FullRefName::new("refs/heads/main").unwrap();
            assert_eq!(name.strip_prefix(FullRefName::HEADS_PREFIX), Some("main"));
            assert_eq!(name.strip_prefix(FullRefName::TAGS_PREFIX), None);
        }
    }

    mod short_sha1 {
        use super::*;

        #[test]
        fn length_bounds() {
            assert_eq!(reason(ShortSha1::new("abc")), FormatReason::TooShort);
            assert!(ShortSha1::new("abcd").is_ok());
            assert!(ShortSha1::new(SHA).is_ok());
            assert_eq!(
                reason(ShortSha1::new(format!("{SHA}0"))),
                FormatReason::TooLong
            );
        }

        #[test]
        fn lowercase_hex_only() {
            assert_eq!(
                reason(ShortSha1::new("ABCD")),
                FormatReason::InvalidCharacters
            );
            assert_eq!(
                reason(ShortSha1::new("abcg")),
                FormatReason::InvalidCharacters
            );
        }

        #[test]
        fn narrows_to_sha1_only_at_full_length() {
            let short = ShortSha1::new("abcd1234").unwrap();
            assert_eq!(reason(Sha1::try_from(short)), FormatReason::TooShort);

            let full = ShortSha1::new(SHA).unwrap();
            assert_eq!(Sha1::try_from(full).unwrap().as_str(), SHA);
        }
    }

    mod sha1 {
        use super::*;

        #[test]
        fn valid_sha1() {
            assert!(Sha1::new(SHA).is_ok());
        }

        #[test]
        fn too_short() {
            assert_eq!(reason(Sha1::new("abcd1234")), FormatReason::TooShort);
            assert_eq!(reason(Sha1::new("abc")), FormatReason::TooShort);
        }

        #[test]
        fn empty() {
            assert_eq!(reason(Sha1::new("")), FormatReason::Empty);
        }

        #[test]
        fn uppercase_rejected() {
            assert_eq!(
                reason(Sha1::new(SHA.to_uppercase())),
                FormatReason::InvalidCharacters
            );
        }

        #[test]
        fn short_form() {
            let sha = Sha1::new(SHA).unwrap();
            assert_eq!(sha.short(7), "abc123d");
            assert_eq!(sha.short(100), SHA);
        }

        #[test]
        fn widens_to_rev() {
            let sha = Sha1::new(SHA).unwrap();
            let short: ShortSha1 = sha.clone().into();
            let rev: Rev = sha.into();
            assert_eq!(short.as_str(), SHA);
            assert_eq!(rev.as_str(), SHA);
        }

        #[test]
        fn parse_via_from_str() {
            let sha: Sha1 = SHA.parse().unwrap();
            assert_eq!(sha.to_string(), SHA);
        }
    }

    mod repository_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(RepositoryName::new("project").is_ok());
            assert!(RepositoryName::new("my-project_2.0").is_ok());
        }

        #[test]
        fn invalid_names() {
            assert_eq!(reason(RepositoryName::new("")), FormatReason::Empty);
            assert_eq!(
                reason(RepositoryName::new("a/b")),
                FormatReason::InvalidCharacters
            );
            assert_eq!(
                reason(RepositoryName::new("a b")),
                FormatReason::InvalidCharacters
            );
        }

        #[test]
        fn case_insensitive_equality_and_hash() {
            let a = RepositoryName::new("Project").unwrap();
            let b = RepositoryName::new("PROJECT").unwrap();
            assert_eq!(a, b);

            let mut set = HashSet::new();
            set.insert(a);
            assert!(set.contains(&b));
        }

        #[test]
        fn preserves_original_case() {
            let name = RepositoryName::new("MyRepo").unwrap();
            assert_eq!(name.to_string(), "MyRepo");
        }
    }

    mod git_url {
        use super::*;

        #[test]
        fn accepted_schemes() {
            for url in [
                "https://example.com/org/project.git",
                "http://example.com/project",
                "ssh://git@example.com/org/project.git",
                "git://example.com/project.git",
                "file:///srv/git/project.git",
                "HTTPS://example.com/project.git",
            ] {
                let parsed = GitUrl::new(url).unwrap();
                assert_eq!(parsed.repository_name().as_str(), "project", "{url}");
            }
        }

        #[test]
        fn rejected_scheme() {
            assert_eq!(
                reason(GitUrl::new("ftp://example.com/project.git")),
                FormatReason::InvalidScheme
            );
        }

        #[test]
        fn relative_rejected() {
            assert_eq!(
                reason(GitUrl::new("../project.git")),
                FormatReason::InvalidUrl
            );
        }

        #[test]
        fn query_and_fragment_rejected() {
            assert_eq!(
                reason(GitUrl::new("https://example.com/p.git?ref=main")),
                FormatReason::QueryNotPermitted
            );
            assert_eq!(
                reason(GitUrl::new("https://example.com/p.git#main")),
                FormatReason::FragmentNotPermitted
            );
        }

        #[test]
        fn repository_name_must_be_valid() {
            let err = GitUrl::new("https://example.com/").unwrap_err();
            assert_eq!(err.kind, RepositoryName::KIND);
            assert_eq!(err.reason, FormatReason::Empty);
        }

        #[test]
        fn strips_only_last_extension() {
            let url = GitUrl::new("https://example.com/a.b.git").unwrap();
            assert_eq!(url.repository_name().as_str(), "a.b");
        }
    }
}
