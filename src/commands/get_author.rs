use std::process::ExitCode;

use anyhow::Result;
use bibtex_dblp::{Config, DblpClient};
use tracing::info;

use crate::cli::GetAuthorArgs;

/// Prints every entry dblp lists for an author.
///
/// An unknown author prints nothing and still succeeds.
pub async fn run_get_author_command(
    args: &GetAuthorArgs,
    config: &Config,
    client: &DblpClient,
) -> Result<ExitCode> {
    match client.fetch_author_bibtex(&args.author, config.format()).await {
        Some(bibtex) => println!("{}", bibtex.trim_end()),
        None => info!(author = %args.author, "No publications found for author"),
    }
    Ok(ExitCode::SUCCESS)
}
