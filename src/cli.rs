//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use bibtex_dblp::BibFormat;
use bibtex_dblp::dblp::{DEFAULT_DBLP_BASE_URL, DEFAULT_DOI_ORG_BASE_URL};
use clap::{Args, Parser, Subcommand};

/// Tools for querying the dblp database and processing its data.
///
/// Keys are dblp ids (e.g. `DBLP:conf/spire/BastMW06`) or DOIs
/// (e.g. `doi:10.1007/11880561_13`). Without a prefix, the type is guessed
/// from the number of slashes.
#[derive(Parser, Debug)]
#[command(name = "dblp")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only produce necessary output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default
    #[arg(short = 'c', long, global = true)]
    pub config_file: Option<PathBuf>,

    /// When retrieving entries by DOI, try doi.org before dblp
    #[arg(long, global = true)]
    pub prefer_doi_org: bool,

    /// BibTeX format of retrieved entries (condensed, standard, crossref)
    #[arg(short = 'f', long, env = "BIBTEX_DBLP_FORMAT", global = true)]
    pub format: Option<BibFormat>,

    /// dblp base URL
    #[arg(
        long,
        env = "BIBTEX_DBLP_BASE_URL",
        default_value = DEFAULT_DBLP_BASE_URL,
        global = true,
        hide = true
    )]
    pub dblp_base_url: String,

    /// doi.org base URL
    #[arg(
        long,
        env = "BIBTEX_DBLP_DOI_ORG_BASE_URL",
        default_value = DEFAULT_DOI_ORG_BASE_URL,
        global = true,
        hide = true
    )]
    pub doi_org_base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Retrieve entries by dblp id or DOI and print them
    ///
    /// Keys are read from standard input, one per line, when none are given.
    Get(GetArgs),
    /// Retrieve all entries of a dblp author and print them
    GetAuthor(GetAuthorArgs),
    /// Search dblp and list matching publications
    Search(SearchArgs),
    /// Search dblp, pick a publication and print or append its entry
    Import(ImportArgs),
    /// Convert entries of a .bib file to the configured dblp format
    Convert(ConvertArgs),
    /// Print all citation keys of a LaTeX .aux file
    Citations(CitationsArgs),
    /// Show or edit the configuration file
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Keys to retrieve
    pub keys: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GetAuthorArgs {
    /// Author in dblp's `Last:First` form, e.g. `Mehlhorn:Kurt`
    pub author: String,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query, matched against titles and authors
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Maximum number of search results to display
    #[arg(
        long,
        env = "BIBTEX_MAX_SEARCH_RESULTS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_results: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Search query; prompted for when omitted
    #[arg(long)]
    pub query: Option<String>,

    /// Append the entry to this .bib file instead of printing it
    #[arg(short, long)]
    pub bib: Option<PathBuf>,

    /// Number of the search result to import; prompted for when omitted
    #[arg(short, long)]
    pub select: Option<usize>,

    /// Maximum number of search results to display
    #[arg(
        long,
        env = "BIBTEX_MAX_SEARCH_RESULTS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_results: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input .bib file (`-` or omitted for standard input)
    pub input: Option<PathBuf>,

    /// Output file (defaults to the input file; `-` for standard output)
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CitationsArgs {
    /// LaTeX .aux file (the extension may be omitted)
    pub auxfile: PathBuf,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
pub struct ConfigArgs {
    /// Print a value and where it was defined
    #[arg(long, value_name = "KEY")]
    pub get: Option<String>,

    /// Set a key/value pair and write it to the config file
    #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
    pub set: Option<Vec<String>>,

    /// Remove a key from the config file
    #[arg(long, value_name = "KEY")]
    pub unset: Option<String>,
}
