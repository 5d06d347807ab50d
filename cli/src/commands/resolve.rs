//! Resolution against and relativization to the base URL.

use std::io::Write;

use anyhow::{Context, Result};
use hrefkit_core::Linker;

pub(crate) fn run_resolve(linker: &Linker, reference: &str, out: &mut dyn Write) -> Result<()> {
    let resolved = linker
        .resolve(reference)
        .with_context(|| format!("cannot resolve '{}'", reference))?;
    writeln!(out, "{}", resolved)?;
    Ok(())
}

pub(crate) fn run_relative(linker: &Linker, url: &str, out: &mut dyn Write) -> Result<()> {
    let relative = linker
        .relativize(url)
        .with_context(|| format!("cannot relativize '{}'", url))?;
    writeln!(out, "{}", relative)?;
    Ok(())
}
