//! parse command - Parse captured git output from stdin
//!
//! Lets scripts reuse the ref and history parsers on output they captured
//! themselves, e.g. from a remote machine or a CI log.

use std::io::{self, Read};

use anyhow::{Context as _, Result};

use crate::cli::args::ParseFormat;
use crate::core::refs::parse_refs;
use crate::core::rev_list::RevList;
use crate::ui::output;

use super::log_cmd::print_commit;
use super::refs::print_refs;
use super::Context;

/// Parse stdin as `format` and print the records.
pub fn parse(ctx: &Context, format: ParseFormat, json: bool) -> Result<()> {
    match format {
        ParseFormat::Refs => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            let refs = parse_refs(&input).context("Failed to parse ref listing")?;
            output::debug(format!("parsed {} refs", refs.len()), ctx.verbosity());
            print_refs(&refs, json)
        }
        ParseFormat::Log => {
            let stdin = io::stdin();
            let commits = RevList::new(stdin.lock());

            if json {
                let commits = commits
                    .collect::<Result<Vec<_>, _>>()
                    .context("Failed to parse commit listing")?;
                output::json(&commits)?;
                return Ok(());
            }

            let mut count = 0;
            for commit in commits {
                let commit = commit.context("Failed to parse commit listing")?;
                print_commit(&commit)?;
                count += 1;
            }
            output::debug(format!("parsed {} commits", count), ctx.verbosity());
            Ok(())
        }
    }
}
