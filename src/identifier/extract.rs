//! Recovery of dblp ids from parsed bibliography entries.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{Identifier, IdentifierKind, classify_key};

/// Field holding the dblp export URL of an entry.
pub const BIBURL_FIELD: &str = "biburl";

#[allow(clippy::expect_used)]
static DBLP_RECORD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://dblp\.org/rec/(\S+)").expect("dblp record URL regex is valid") // Static pattern, safe to panic
});

/// Read-only view of a parsed bibliography entry.
///
/// Implemented by [`crate::bibtex::BibtexEntry`]; callers with their own
/// entry type only need to expose field lookup and the citation key.
pub trait BibEntry {
    /// Returns the value of the field `name`, if present.
    fn field(&self, name: &str) -> Option<&str>;

    /// The citation key, e.g. `DBLP:conf/spire/BastMW06`.
    fn citation_key(&self) -> &str;
}

/// Extracts the dblp id of `entry`.
///
/// A dblp record URL in `biburl` wins over the citation key. A citation key
/// that classifies as a DOI (or not at all) does not count.
#[must_use]
pub fn extract_dblp_id(entry: &impl BibEntry) -> Option<Identifier> {
    if let Some(path) = entry.field(BIBURL_FIELD).and_then(record_path_from_url) {
        trace!(key = %entry.citation_key(), dblp_id = %path, "dblp id taken from biburl");
        return Some(Identifier::dblp(path));
    }

    let identifier = classify_key(entry.citation_key());
    (identifier.kind() == IdentifierKind::Dblp).then_some(identifier)
}

fn record_path_from_url(url: &str) -> Option<&str> {
    let path = DBLP_RECORD_URL.captures(url)?.get(1)?.as_str();
    let path = path.strip_suffix(".bib").unwrap_or(path);
    (!path.is_empty()).then_some(path)
}
