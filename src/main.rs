//! CLI entry point for the dblp tool.

use std::process::ExitCode;

use anyhow::{Context, Result};
use bibtex_dblp::{Config, DblpClient, Endpoints, Settings};
use clap::Parser;
use tracing::debug;

mod cli;
mod commands;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries BibTeX output only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    debug!(?cli, "CLI arguments parsed");

    let mut config =
        Config::load(cli.config_file.as_deref()).context("Failed to load configuration")?;
    config.set_command_line(Settings {
        format: cli.format,
        max_search_results: match &cli.command {
            Command::Search(args) => args.max_results,
            Command::Import(args) => args.max_results,
            _ => None,
        },
    });

    let options = commands::RunOptions {
        prefer_doi_org: cli.prefer_doi_org,
        quiet: cli.quiet,
    };

    let command = match &cli.command {
        Command::Config(args) => return commands::run_config_command(args, &mut config),
        Command::Citations(args) => return commands::run_citations_command(args),
        command => command,
    };

    let endpoints = Endpoints::new(cli.dblp_base_url.as_str(), cli.doi_org_base_url.as_str());
    let client =
        DblpClient::with_endpoints(endpoints).context("Failed to initialize dblp client")?;
    match command {
        Command::Get(args) => commands::run_get_command(args, &config, &client, options).await,
        Command::GetAuthor(args) => commands::run_get_author_command(args, &config, &client).await,
        Command::Search(args) => commands::run_search_command(args, &config, &client).await,
        Command::Import(args) => {
            commands::run_import_command(args, &config, &client, options).await
        }
        Command::Convert(args) => {
            commands::run_convert_command(args, &config, &client, options).await
        }
        Command::Config(_) | Command::Citations(_) => Ok(ExitCode::SUCCESS),
    }
}
