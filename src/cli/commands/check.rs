//! check command - Validate a string as a git identifier

use anyhow::Result;

use crate::cli::args::IdentifierKind;
use crate::core::types::{
    FormatError, FullRefName, GitUrl, RefName, RefNameComponent, RepositoryName, Rev, Sha1,
    ShortSha1,
};
use crate::ui::output;

use super::Context;

/// Validate `value` as `kind` and print it.
///
/// An invalid value is an error carrying the rejection reason.
pub fn check(ctx: &Context, kind: IdentifierKind, value: &str) -> Result<()> {
    let valid = validate(kind, value)?;
    output::print(valid, ctx.verbosity());
    Ok(())
}

/// Run the grammar for `kind`, returning the value as the type renders it.
pub(crate) fn validate(kind: IdentifierKind, value: &str) -> Result<String, FormatError> {
    Ok(match kind {
        IdentifierKind::Rev => Rev::new(value)?.into(),
        IdentifierKind::RefName => RefName::new(value)?.into(),
        IdentifierKind::RefNameComponent => RefNameComponent::new(value)?.into(),
        IdentifierKind::FullRefName => FullRefName::new(value)?.into(),
        IdentifierKind::ShortSha1 => ShortSha1::new(value)?.into(),
        IdentifierKind::Sha1 => Sha1::new(value)?.into(),
        IdentifierKind::RepositoryName => RepositoryName::new(value)?.into(),
        IdentifierKind::GitUrl => {
            let url = GitUrl::new(value)?;
            format!("{}\t{}", url, url.repository_name())
        }
    })
}
