//! Citation keys from LaTeX `.aux` files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static CITATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\citation\{([^}]*)\}").expect("aux citation regex is valid") // Static pattern, safe to panic
});

/// Appends `.aux` unless `path` already ends with it.
#[must_use]
pub fn aux_path(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "aux") {
        path.to_path_buf()
    } else {
        let mut with_ext = path.as_os_str().to_owned();
        with_ext.push(".aux");
        PathBuf::from(with_ext)
    }
}

/// Collects the distinct keys of all `\citation{a,b}` lines, sorted.
///
/// `*` (from `\nocite{*}`) is skipped.
#[must_use]
pub fn extract_citations(aux: &str) -> BTreeSet<String> {
    CITATION_PATTERN
        .captures_iter(aux)
        .filter_map(|cap| cap.get(1))
        .flat_map(|keys| keys.as_str().split(','))
        .map(str::trim)
        .filter(|key| !key.is_empty() && *key != "*")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_citations_sorted_and_unique() {
        let aux = r"\relax
\citation{DBLP:conf/spire/BastMW06}
\citation{10.2307/2268281,DBLP:conf/spire/BastMW06}
\bibstyle{plain}
\citation{*}
\bibdata{main}";
        let keys: Vec<_> = extract_citations(aux).into_iter().collect();
        assert_eq!(keys, ["10.2307/2268281", "DBLP:conf/spire/BastMW06"]);
    }

    #[test]
    fn test_aux_path_appends_extension_once() {
        assert_eq!(aux_path(Path::new("main")), PathBuf::from("main.aux"));
        assert_eq!(aux_path(Path::new("build/main.aux")), PathBuf::from("build/main.aux"));
        assert_eq!(aux_path(Path::new("paper.v2")), PathBuf::from("paper.v2.aux"));
    }
}
