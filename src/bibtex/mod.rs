//! Minimal BibTeX reader and writer.
//!
//! Only what conversion and duplicate detection need: entries are split into
//! citation key, entry type and a field map, while their original text is
//! kept so unchanged entries are written back byte for byte. Text between
//! entries (comments, `@string`/`@preamble` blocks, malformed input) is
//! preserved verbatim.

mod similar;

pub use similar::{SIMILARITY_THRESHOLD, SimilarEntry, search_similar};

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::identifier::BibEntry;

#[allow(clippy::expect_used)]
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));
#[allow(clippy::expect_used)]
static AUTHOR_SPLIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").expect("bibtex author split regex is valid"));

/// Block types that are not bibliography entries.
const IGNORED_BLOCK_TYPES: [&str; 3] = ["comment", "preamble", "string"];

/// One parsed `@type{key, ...}` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibtexEntry {
    /// Lower-cased entry type (`article`, `inproceedings`, ...).
    pub entry_type: String,
    /// Citation key after `@type{`.
    pub key: String,
    /// Fields keyed by lower-cased name, values without delimiters.
    pub fields: HashMap<String, String>,
    /// Original text of the entry.
    pub raw: String,
}

impl BibtexEntry {
    /// Author names joined with `, `, or an empty string.
    #[must_use]
    pub fn authors(&self) -> String {
        self.fields
            .get("author")
            .map(|value| {
                AUTHOR_SPLIT_PATTERN
                    .split(value)
                    .map(str::trim)
                    .filter(|segment| !segment.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }

    /// Short human-readable description used when listing candidates.
    #[must_use]
    pub fn summary(&self) -> String {
        let field = |name: &str| self.fields.get(name).map_or("", String::as_str);
        let mut book = field("booktitle").to_string();
        if let Some(volume) = self.fields.get("volume") {
            book.push_str(&format!(" ({volume})"));
        }
        format!(
            "{}:\n\t{} {} {}",
            self.authors(),
            field("title"),
            book.trim(),
            field("year")
        )
    }
}

impl BibEntry for BibtexEntry {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn citation_key(&self) -> &str {
        &self.key
    }
}

/// A piece of a bibliography file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A parsed entry.
    Entry(BibtexEntry),
    /// Anything else, kept verbatim.
    Verbatim(String),
}

/// A bibliography file as an ordered list of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    segments: Vec<Segment>,
}

impl Bibliography {
    /// Parses `input`, never failing: unparseable text is kept verbatim.
    #[tracing::instrument(skip(input), fields(input_len = input.len()))]
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut segments = Vec::new();
        let mut cursor = 0usize;

        for (start, end) in entry_spans(input) {
            push_verbatim(&mut segments, &input[cursor..start]);
            let raw = &input[start..end];
            match parse_entry(raw) {
                Some(entry) => segments.push(Segment::Entry(entry)),
                None => push_verbatim(&mut segments, raw),
            }
            cursor = end;
        }
        push_verbatim(&mut segments, &input[cursor..]);

        let bibliography = Self { segments };
        debug!(entries = bibliography.len(), "parsed bibliography");
        bibliography
    }

    /// Iterates over the parsed entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = &BibtexEntry> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Entry(entry) => Some(entry),
            Segment::Verbatim(_) => None,
        })
    }

    /// Mutable access to the segments, for in-place replacement.
    pub fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    /// Number of parsed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if an entry with citation key `key` exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries().any(|entry| entry.key == key)
    }

    /// Appends an entry at the end of the bibliography.
    pub fn push(&mut self, entry: BibtexEntry) {
        self.segments.push(Segment::Entry(entry));
    }

    /// Renders the bibliography, separating segments with a blank line.
    #[must_use]
    pub fn to_bibtex_string(&self) -> String {
        let mut out = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Entry(entry) => entry.raw.as_str(),
                Segment::Verbatim(text) => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

fn push_verbatim(segments: &mut Vec<Segment>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        segments.push(Segment::Verbatim(text.to_string()));
    }
}

/// Replaces the citation key of the entry text `raw` with `new_key`.
///
/// Returns `raw` unchanged when it has no `@type{key,` header.
#[must_use]
pub fn rename_entry_key(raw: &str, new_key: &str) -> String {
    let Some(open) = raw.find('{') else {
        return raw.to_string();
    };
    let Some(comma_offset) = raw[open + 1..].find(',') else {
        return raw.to_string();
    };
    let comma = open + 1 + comma_offset;
    format!("{}{new_key}{}", &raw[..=open], &raw[comma..])
}

/// Byte ranges of `@type{...}` blocks with balanced braces.
fn entry_spans(input: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut spans = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i].1 != '@' {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && chars[j].1.is_ascii_alphabetic() {
            j += 1;
        }
        while j < chars.len() && chars[j].1.is_whitespace() {
            j += 1;
        }
        if j >= chars.len() || chars[j].1 != '{' {
            i += 1;
            continue;
        }

        let mut depth = 0usize;
        let mut found_end = None;
        for (k, &(_, ch)) in chars.iter().enumerate().skip(j) {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        found_end = Some(k);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(end_index) = found_end else {
            // Unbalanced: leave the rest to the verbatim tail.
            break;
        };
        let end_exclusive = chars
            .get(end_index + 1)
            .map_or(input.len(), |&(offset, _)| offset);
        spans.push((chars[i].0, end_exclusive));
        i = end_index + 1;
    }

    spans
}

fn parse_entry(raw: &str) -> Option<BibtexEntry> {
    let after_at = raw.strip_prefix('@')?;
    let brace_pos = after_at.find('{')?;
    let entry_type = after_at[..brace_pos].trim().to_ascii_lowercase();
    if IGNORED_BLOCK_TYPES.contains(&entry_type.as_str()) {
        return None;
    }

    let body = after_at[brace_pos + 1..].strip_suffix('}')?;
    let (key, fields_raw) = body.split_once(',').unwrap_or((body, ""));
    let key = key.trim();
    if key.is_empty() {
        debug!(entry_type = %entry_type, "skipping entry without citation key");
        return None;
    }

    Some(BibtexEntry {
        entry_type,
        key: key.to_string(),
        fields: parse_fields(fields_raw),
        raw: raw.to_string(),
    })
}

fn parse_fields(input: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for assignment in split_top_level(input) {
        let Some((name, value)) = assignment.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        // First-value-wins per standard BibTeX convention.
        fields.entry(name).or_insert_with(|| strip_value(value));
    }
    fields
}

/// Splits on commas outside braces and quotes.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0usize;

    for (offset, ch) in input.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth == 0 => in_quotes = !in_quotes,
            ',' if depth == 0 && !in_quotes => {
                parts.push(input[start..offset].trim());
                start = offset + 1;
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts.retain(|part| !part.is_empty());
    parts
}

fn strip_value(value: &str) -> String {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .or_else(|| {
            trimmed
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
        })
        .unwrap_or(trimmed);
    WHITESPACE_RUN.replace_all(inner.trim(), " ").into_owned()
}
