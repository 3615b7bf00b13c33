//! `dblp get`: print BibTeX entries for dblp ids and DOIs.

use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bibtex_dblp::{Config, DblpClient};
use tracing::{debug, error};

use super::RunOptions;
use crate::cli::GetArgs;

/// Fetches every key and prints the entries found.
///
/// Keys are read line by line from stdin when none are passed. The exit code
/// is 1 if any key could not be retrieved.
pub async fn run_get_command(
    args: &GetArgs,
    config: &Config,
    client: &DblpClient,
    options: RunOptions,
) -> Result<ExitCode> {
    let keys = if args.keys.is_empty() {
        debug!("No keys given, reading from stdin");
        read_keys(io::stdin().lock())?
    } else {
        args.keys.clone()
    };

    let format = config.format();
    let mut failed = 0usize;
    for key in &keys {
        match client.fetch_bibtex(key, format, options.prefer_doi_org).await {
            Some(bibtex) => println!("{}", bibtex.trim_end()),
            None => {
                error!(key = %key, "Could not retrieve entry");
                failed += 1;
            }
        }
    }

    debug!(total = keys.len(), failed, "Get finished");
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn read_keys(reader: impl BufRead) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read keys from standard input")?;
        let key = line.trim();
        if !key.is_empty() {
            keys.push(key.to_string());
        }
    }
    Ok(keys)
}
