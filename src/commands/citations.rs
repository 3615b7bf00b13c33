use std::process::ExitCode;

use anyhow::{Context, Result};
use bibtex_dblp::citations::{aux_path, extract_citations};
use tracing::debug;

use crate::cli::CitationsArgs;

/// Prints the citation keys of an `.aux` file, one per line.
pub fn run_citations_command(args: &CitationsArgs) -> Result<ExitCode> {
    let path = aux_path(&args.auxfile);
    let aux = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let keys = extract_citations(&aux);
    debug!(path = %path.display(), count = keys.len(), "Extracted citations");
    for key in keys {
        println!("{key}");
    }
    Ok(ExitCode::SUCCESS)
}
