//! Link rewriting in free text.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use hrefkit_core::Linker;

/// Rewrite `text`, or stdin when no text is given; stdin is echoed with its
/// own line endings
pub(crate) fn run_rewrite(
    linker: &Linker,
    text: Option<&str>,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    match text {
        Some(text) => writeln!(out, "{}", linker.rewrite_links(text))?,
        None => {
            let mut buffer = String::new();
            input
                .read_to_string(&mut buffer)
                .context("failed to read text from stdin")?;
            write!(out, "{}", linker.rewrite_links(&buffer))?;
        }
    }
    Ok(())
}
