//! Re-export of bibliography entries in a different dblp format.

use tracing::{debug, warn};

use crate::bibtex::{Bibliography, BibtexEntry, Segment, rename_entry_key};
use crate::dblp::{BibFormat, DblpClient};
use crate::identifier::extract_dblp_id;

/// Outcome of [`convert_dblp_entries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Entries replaced with a freshly fetched version.
    pub updated: usize,
    /// Entries with a dblp id whose lookup failed.
    pub failed: usize,
    /// Entries added alongside converted ones (crossref proceedings).
    pub added: usize,
}

/// Replaces every entry with a recoverable dblp id by dblp's export in
/// `format`, keeping the entry's citation key.
///
/// With [`BibFormat::Crossref`], dblp also returns the referenced
/// `@proceedings` entry; it is appended unless an entry with that key exists.
/// Entries without a dblp id, and entries whose lookup fails, are left as they
/// are.
#[tracing::instrument(skip(client, bibliography), fields(format = %format))]
pub async fn convert_dblp_entries(
    client: &DblpClient,
    bibliography: &mut Bibliography,
    format: BibFormat,
) -> ConvertStats {
    let mut stats = ConvertStats::default();
    let mut extra_entries: Vec<BibtexEntry> = Vec::new();

    for segment in bibliography.segments_mut().iter_mut() {
        let Segment::Entry(entry) = segment else {
            continue;
        };
        let Some(id) = extract_dblp_id(&*entry) else {
            continue;
        };
        debug!(key = %entry.key, dblp_id = %id.key(), "Found dblp id");

        let Some(fetched) = client.fetch_bibtex(&id.to_string(), format, false).await else {
            warn!(key = %entry.key, "Keeping entry unchanged; dblp lookup failed");
            stats.failed += 1;
            continue;
        };

        let fetched = Bibliography::parse(&fetched);
        let mut fetched_entries = fetched.entries();
        let Some(main) = fetched_entries.next() else {
            warn!(key = %entry.key, "Keeping entry unchanged; dblp returned no entry");
            stats.failed += 1;
            continue;
        };

        let original_key = entry.key.clone();
        let mut replacement = main.clone();
        replacement.raw = rename_entry_key(&main.raw, &original_key);
        replacement.key = original_key;
        *entry = replacement;
        stats.updated += 1;

        if format == BibFormat::Crossref {
            extra_entries.extend(
                fetched_entries
                    .filter(|extra| extra.key != main.key)
                    .cloned(),
            );
        }
        debug!(key = %entry.key, "Set new entry");
    }

    for extra in extra_entries {
        if bibliography.contains_key(&extra.key) {
            continue;
        }
        debug!(key = %extra.key, "Adding referenced entry");
        bibliography.push(extra);
        stats.added += 1;
    }

    stats
}
