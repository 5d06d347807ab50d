//! URL equivalence.

use std::io::Write;

use anyhow::Result;
use hrefkit_core::Linker;

use crate::Outcome;

pub(crate) fn run_equals(
    linker: &Linker,
    one: &str,
    two: &str,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let same = linker.same_target(one, two)?;
    tracing::info!(one, two, same, "Compared URLs");

    writeln!(out, "{}", same)?;
    Ok(if same {
        Outcome::Success
    } else {
        Outcome::Mismatch
    })
}
