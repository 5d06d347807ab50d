//! Subcommand handlers.

mod compare;
mod inspect;
mod query;
mod resolve;
mod text;

use std::io::{Read, Write};

use anyhow::Result;
use hrefkit_core::Linker;

use crate::cli::{Command, QueryCommand};
use crate::Outcome;

pub(crate) fn dispatch(
    command: &Command,
    linker: &Linker,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<Outcome> {
    match command {
        Command::Inspect { url, compact } => inspect::run_inspect(linker, url, *compact, out)?,
        Command::Normalize { url } => inspect::run_normalize(linker, url, out)?,
        Command::Readable { url } => inspect::run_readable(linker, url, out)?,
        Command::Resolve { reference } => resolve::run_resolve(linker, reference, out)?,
        Command::Relative { url } => resolve::run_relative(linker, url, out)?,
        Command::Equals { one, two } => return compare::run_equals(linker, one, two, out),
        Command::Rewrite { text } => text::run_rewrite(linker, text.as_deref(), input, out)?,
        Command::Query { command } => match command {
            QueryCommand::Add { url, params } => query::run_query_add(linker, url, params, out)?,
            QueryCommand::Remove { url, names } => {
                query::run_query_remove(linker, url, names, out)?
            }
        },
    }

    Ok(Outcome::Success)
}
