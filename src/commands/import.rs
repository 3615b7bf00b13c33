//! `dblp import`: search dblp and import one publication.
//!
//! Listings, prompts and status lines go to stderr so that stdout holds
//! nothing but the imported BibTeX.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use bibtex_dblp::bibtex::search_similar;
use bibtex_dblp::{Bibliography, Config, DblpClient};
use tracing::{info, warn};

use super::search::render_results;
use super::{RunOptions, prompt, prompt_selection};
use crate::cli::ImportArgs;

pub async fn run_import_command(
    args: &ImportArgs,
    config: &Config,
    client: &DblpClient,
    options: RunOptions,
) -> Result<ExitCode> {
    let query = match &args.query {
        Some(query) => query.clone(),
        None => prompt("Give the publication title to search for: ")?,
    };
    if query.is_empty() {
        bail!("Empty search query");
    }

    if let Some(bib_path) = &args.bib
        && let Some(existing) = find_local_entry(bib_path, &query)?
    {
        info!(key = %existing, "Selected existing entry; use '{existing}' to cite it");
        return Ok(ExitCode::SUCCESS);
    }

    let results = client
        .search_publications(&query, config.max_search_results())
        .await
        .with_context(|| format!("Search for '{query}' failed"))?;
    if results.results().is_empty() {
        eprintln!("The search returned no matches.");
        return Ok(ExitCode::FAILURE);
    }
    eprint!("{}", render_results(&results));

    let count = results.results().len();
    let selected = match args.select {
        Some(selected) if selected <= count => selected,
        Some(selected) => bail!("Selection {selected} is out of range 0..={count}"),
        None => prompt_selection("Select the intended publication (0 to abort)", count, 1)?,
    };
    if selected == 0 {
        eprintln!("Cancelled.");
        return Ok(ExitCode::FAILURE);
    }

    let publication = &results.results()[selected - 1];
    let cite_key = publication.cite_key();
    let Some(bibtex) = client
        .fetch_bibtex(&cite_key, config.format(), options.prefer_doi_org)
        .await
    else {
        bail!("Could not retrieve the BibTeX entry for {cite_key}");
    };

    match &args.bib {
        Some(bib_path) => {
            append_entry(bib_path, &bibtex)?;
            info!(path = %bib_path.display(), "Bibtex file updated");
        }
        None => println!("{}", bibtex.trim_end()),
    }
    info!(key = %cite_key, "Use '{cite_key}' to cite it");
    Ok(ExitCode::SUCCESS)
}

/// Lists entries of `bib_path` resembling `query`.
///
/// Returns the key of the entry the user picked, if any. The user is only
/// asked when stdin is a terminal.
fn find_local_entry(bib_path: &Path, query: &str) -> Result<Option<String>> {
    if !bib_path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(bib_path)
        .with_context(|| format!("Failed to read {}", bib_path.display()))?;
    let bibliography = Bibliography::parse(&content);
    let similar = search_similar(&bibliography, query);
    if similar.is_empty() {
        return Ok(None);
    }

    eprintln!("The bibtex file already contains the following matches:");
    for (index, found) in similar.iter().enumerate() {
        eprintln!("({})\t{}", index + 1, found.entry.summary());
    }
    if !io::stdin().is_terminal() {
        warn!(matches = similar.len(), "Possible duplicates in bibtex file");
        return Ok(None);
    }

    let selected = prompt_selection(
        "Select the intended publication (0 to search online)",
        similar.len(),
        0,
    )?;
    Ok(selected
        .checked_sub(1)
        .and_then(|index| similar.get(index))
        .map(|found| found.entry.key.clone()))
}

fn append_entry(bib_path: &Path, bibtex: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(bib_path)
        .with_context(|| format!("Failed to open {}", bib_path.display()))?;
    write!(file, "\n{}\n", bibtex.trim())
        .with_context(|| format!("Failed to write {}", bib_path.display()))?;
    Ok(())
}
