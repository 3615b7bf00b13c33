//! CLI command handlers.

mod citations;
mod config;
mod convert;
mod get;
mod get_author;
mod import;
mod search;

pub use citations::run_citations_command;
pub use config::run_config_command;
pub use convert::run_convert_command;
pub use get::run_get_command;
pub use get_author::run_get_author_command;
pub use import::run_import_command;
pub use search::run_search_command;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

/// Flags shared by the network-backed commands.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub prefer_doi_org: bool,
    pub quiet: bool,
}

/// Prints `message` to stderr and reads one trimmed line from stdin.
fn prompt(message: &str) -> Result<String> {
    eprint!("{message}");
    io::stderr().flush().ok();
    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from standard input")?;
    if read == 0 {
        bail!("No answer given (standard input closed)");
    }
    Ok(line.trim().to_string())
}

/// Prompts for a number in `0..=max`, using `default` on empty input.
fn prompt_selection(message: &str, max: usize, default: usize) -> Result<usize> {
    let answer = prompt(&format!("{message} [{default}]: "))?;
    if answer.is_empty() {
        return Ok(default);
    }
    let selected: usize = answer
        .parse()
        .with_context(|| format!("'{answer}' is not a number"))?;
    if selected > max {
        bail!("Selection {selected} is out of range 0..={max}");
    }
    Ok(selected)
}
