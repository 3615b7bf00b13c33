//! Fuzzy lookup of entries already present in a bibliography.

use std::cmp::Ordering;

use super::{Bibliography, BibtexEntry};

/// Entries scoring above this are reported as possible duplicates.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// An entry with its similarity to the query (0.0 to 1.0).
#[derive(Debug, Clone)]
pub struct SimilarEntry<'a> {
    pub entry: &'a BibtexEntry,
    pub score: f64,
}

/// Finds entries whose `"<authors>:<title>"` resembles `query`, best first.
#[must_use]
pub fn search_similar<'a>(bibliography: &'a Bibliography, query: &str) -> Vec<SimilarEntry<'a>> {
    let query_norm = normalize(query);
    if query_norm.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<SimilarEntry<'a>> = bibliography
        .entries()
        .filter_map(|entry| {
            let title = entry.fields.get("title").map_or("", String::as_str);
            let haystack = normalize(&format!("{}:{title}", entry.authors()));
            let score = search_score(&haystack, &query_norm);
            (score > SIMILARITY_THRESHOLD).then_some(SimilarEntry { entry, score })
        })
        .collect();

    matches.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
    });
    matches
}

/// Best normalized Levenshtein similarity of `query` against the whole
/// haystack or any window of the same number of words.
fn search_score(haystack: &str, query: &str) -> f64 {
    let mut best = strsim::normalized_levenshtein(haystack, query);
    let words: Vec<&str> = haystack.split_whitespace().collect();
    let window = query.split_whitespace().count().max(1);
    if words.len() > window {
        for span in words.windows(window) {
            best = best.max(strsim::normalized_levenshtein(&span.join(" "), query));
        }
    }
    best
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BIB: &str = r"
@inproceedings{bast06,
  author = {H. Bast and Christian Worm Mortensen and Ingmar Weber},
  title  = {Output-Sensitive Autocompletion Search},
  year   = {2006}
}
@article{knuth84,
  author = {Donald E. Knuth},
  title  = {Literate Programming},
  year   = {1984}
}";

    #[test]
    fn test_title_query_matches_entry() {
        let bib = Bibliography::parse(BIB);
        let matches = search_similar(&bib, "output sensitive autocompletion search");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entry.key, "bast06");
        assert!(matches[0].score > 0.9, "score: {}", matches[0].score);
    }

    #[test]
    fn test_typo_still_matches() {
        let bib = Bibliography::parse(BIB);
        let matches = search_similar(&bib, "Literate Programing");
        assert_eq!(matches.first().unwrap().entry.key, "knuth84");
    }

    #[test]
    fn test_unrelated_query_matches_nothing() {
        let bib = Bibliography::parse(BIB);
        assert!(search_similar(&bib, "quantum chromodynamics lattice").is_empty());
        assert!(search_similar(&bib, "  ").is_empty());
    }
}
