//! Query parameter edits.

use std::io::Write;

use anyhow::Result;
use hrefkit_core::{Linker, QueryMap};

/// `name=value` pairs; a bare `name` carries no value
fn parse_params(params: &[String]) -> QueryMap {
    params
        .iter()
        .map(|param| match param.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (param.as_str(), None),
        })
        .collect()
}

pub(crate) fn run_query_add(
    linker: &Linker,
    url: &str,
    params: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    let uri = linker.with_query(url, parse_params(params))?;
    writeln!(out, "{}", uri)?;
    Ok(())
}

pub(crate) fn run_query_remove(
    linker: &Linker,
    url: &str,
    names: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    let uri = linker.without_query(url, names)?;
    writeln!(out, "{}", uri)?;
    Ok(())
}
