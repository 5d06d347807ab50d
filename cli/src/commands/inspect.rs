//! Single-URL views: component report, normalized and readable forms.

use std::io::Write;

use anyhow::Result;
use hrefkit_core::Linker;

pub(crate) fn run_inspect(
    linker: &Linker,
    url: &str,
    compact: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let report = linker.describe(url);
    let json = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    writeln!(out, "{}", json)?;
    Ok(())
}

pub(crate) fn run_normalize(linker: &Linker, url: &str, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", linker.parse(url))?;
    Ok(())
}

pub(crate) fn run_readable(linker: &Linker, url: &str, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", linker.readable(url))?;
    Ok(())
}
