//! `dblp search`: list dblp publications matching a query.

use std::process::ExitCode;

use anyhow::{Context, Result};
use bibtex_dblp::{Config, DblpClient, SearchResults};

use crate::cli::SearchArgs;

pub async fn run_search_command(
    args: &SearchArgs,
    config: &Config,
    client: &DblpClient,
) -> Result<ExitCode> {
    let query = args.query.join(" ");
    let results = client
        .search_publications(&query, config.max_search_results())
        .await
        .with_context(|| format!("Search for '{query}' failed"))?;

    print!("{}", render_results(&results));
    Ok(ExitCode::SUCCESS)
}

/// Numbered listing shared by `search` and `import`.
pub(super) fn render_results(results: &SearchResults) -> String {
    let mut out = format!("The search returned {} matches:\n", results.total_matches());
    if results.is_truncated() {
        out.push_str(&format!(
            "Displaying only the first {} matches.\n",
            results.results().len()
        ));
    }
    for (index, publication) in results.results().iter().enumerate() {
        out.push_str(&format!("({})\t{publication}\n", index + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"result":{
        "status":{"@code":"200","text":"OK"},
        "hits":{"@total":"7","hit":[{"info":{
            "key":"conf/spire/BastMW06",
            "title":"Output-Sensitive Autocompletion Search.",
            "authors":{"author":[{"text":"Holger Bast"},{"text":"Christian Worm Mortensen"},{"text":"Ingmar Weber"}]},
            "venue":"SPIRE","year":"2006","type":"Conference and Workshop Papers"}}]}}}"#;

    #[test]
    fn test_render_results_numbers_and_truncation() {
        let results = SearchResults::from_json("http://test/search", BODY).unwrap();
        let rendered = render_results(&results);
        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("The search returned 7 matches:"));
        assert_eq!(lines.next(), Some("Displaying only the first 1 matches."));
        let first = lines.next().unwrap();
        assert!(first.starts_with("(1)\tHolger Bast"), "{first}");
        assert!(first.contains("Output-Sensitive Autocompletion Search."));
        assert_eq!(lines.next(), None);
    }
}
