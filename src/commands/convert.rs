//! `dblp convert`: rewrite a bibliography in the configured dblp format.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use bibtex_dblp::{Bibliography, Config, DblpClient, convert_dblp_entries};
use tracing::info;

use super::RunOptions;
use crate::cli::ConvertArgs;

const STDIO: &str = "-";

pub async fn run_convert_command(
    args: &ConvertArgs,
    config: &Config,
    client: &DblpClient,
    options: RunOptions,
) -> Result<ExitCode> {
    let input = args.input.as_deref().filter(|path| !is_stdio(path));
    let content = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read bibliography from standard input")?;
            buffer
        }
    };

    let mut bibliography = Bibliography::parse(&content);
    let format = config.format();
    let stats = convert_dblp_entries(client, &mut bibliography, format).await;

    if !options.quiet {
        eprintln!(
            "Updated {} entries (out of {}) from DBLP",
            stats.updated,
            bibliography.len().saturating_sub(stats.added)
        );
    }
    if stats.failed > 0 {
        info!(failed = stats.failed, "Some entries were left unchanged");
    }

    let rendered = bibliography.to_bibtex_string();
    match output_path(input, args.output.as_deref()) {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !options.quiet {
                eprintln!("Written to {}", path.display());
            }
        }
        None => print!("{rendered}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

/// Destination file, or `None` for stdout.
///
/// An explicit output wins; otherwise a file input is rewritten in place.
fn output_path(input: Option<&Path>, output: Option<&Path>) -> Option<PathBuf> {
    match output {
        Some(path) if is_stdio(path) => None,
        Some(path) => Some(path.to_path_buf()),
        None => input.map(Path::to_path_buf),
    }
}
