//! Parsed responses of the dblp publication search API.
//!
//! The API wraps everything in `result`, reports its own status under
//! `result.status["@code"]` and encodes numbers as strings. Several fields
//! (`authors.author`, `venue`, `ee`) are a single value for one item and an
//! array for more.

use std::fmt;

use serde::Deserialize;

use super::DblpError;

/// Status code the search API embeds on success.
const SEARCH_STATUS_OK: u16 = 200;

// ==================== dblp API Response Types ====================

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    result: RawResult,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    status: RawStatus,
    hits: Option<RawHits>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(rename = "@code")]
    code: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    #[serde(rename = "@total")]
    total: Option<String>,
    #[serde(default)]
    hit: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    info: RawInfo,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    authors: Option<RawAuthors>,
    title: Option<String>,
    venue: Option<OneOrMany<String>>,
    volume: Option<String>,
    pages: Option<String>,
    year: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    key: String,
    doi: Option<String>,
    ee: Option<OneOrMany<String>>,
    url: Option<String>,
    booktitle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAuthors {
    author: OneOrMany<RawAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    #[serde(rename = "@pid")]
    pid: Option<String>,
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

// ==================== Domain Types ====================

/// A publication author as listed by dblp (name may carry a disambiguation
/// number, e.g. `H. Bast 0001`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub pid: Option<String>,
}

/// One publication from a search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// dblp record id, e.g. `journals/ir/BastMW08`.
    pub key: String,
    pub title: Option<String>,
    pub authors: Vec<Author>,
    pub venue: Option<String>,
    pub volume: Option<String>,
    pub pages: Option<String>,
    pub year: Option<u16>,
    /// Publication type label, e.g. `Journal Articles`.
    pub kind: Option<String>,
    pub doi: Option<String>,
    /// Electronic edition link.
    pub ee: Option<String>,
    /// dblp record page.
    pub url: Option<String>,
    pub booktitle: Option<String>,
}

impl Publication {
    /// Citation key dblp uses for this record, e.g. `DBLP:journals/ir/BastMW08`.
    #[must_use]
    pub fn cite_key(&self) -> String {
        format!("DBLP:{}", self.key)
    }

    /// Author names joined with `, `.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(|author| author.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn from_raw(info: RawInfo) -> Self {
        Self {
            key: info.key,
            title: info.title,
            authors: info
                .authors
                .map(|authors| {
                    authors
                        .author
                        .into_vec()
                        .into_iter()
                        .map(|author| Author {
                            name: author.text,
                            pid: author.pid,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            venue: info.venue.and_then(|venue| venue.into_vec().into_iter().next()),
            volume: info.volume,
            pages: info.pages,
            year: info.year.and_then(|year| year.trim().parse().ok()),
            kind: info.kind,
            doi: info.doi,
            ee: info.ee.and_then(|ee| ee.into_vec().into_iter().next()),
            url: info.url,
            booktitle: info.booktitle,
        }
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.author_names())?;
        if let Some(title) = &self.title {
            write!(f, " {title}")?;
        }
        if let Some(venue) = &self.venue {
            write!(f, " {venue}")?;
        }
        if let Some(volume) = &self.volume {
            write!(f, " ({volume})")?;
        }
        if let Some(year) = self.year {
            write!(f, " {year}")?;
        }
        Ok(())
    }
}

/// A successful search response.
///
/// Only constructed when the embedded status code is 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    status_code: u16,
    total_matches: usize,
    results: Vec<Publication>,
}

impl SearchResults {
    /// Parses a search API body fetched from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DblpError::MalformedResponse`] for invalid JSON or an
    /// unparseable status code, and [`DblpError::SearchStatus`] when the
    /// embedded status is not 200.
    pub fn from_json(url: &str, body: &str) -> Result<Self, DblpError> {
        let envelope: SearchEnvelope = serde_json::from_str(body)
            .map_err(|error| DblpError::malformed(url, &error.to_string()))?;
        let RawResult { status, hits } = envelope.result;

        let status_code: u16 = status.code.trim().parse().map_err(|_| {
            DblpError::malformed(url, &format!("status code '{}' is not a number", status.code))
        })?;
        if status_code != SEARCH_STATUS_OK {
            return Err(DblpError::search_status(
                status_code,
                status.text.as_deref().unwrap_or("no status text"),
            ));
        }

        let (total, hits) = hits.map_or((None, Vec::new()), |hits| (hits.total, hits.hit));
        let results: Vec<Publication> = hits
            .into_iter()
            .map(|hit| Publication::from_raw(hit.info))
            .collect();
        let total_matches = match total {
            Some(total) => total.trim().parse().map_err(|_| {
                DblpError::malformed(url, &format!("hit total '{total}' is not a number"))
            })?,
            None => results.len(),
        };

        Ok(Self {
            status_code,
            total_matches,
            results,
        })
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Number of matches dblp knows of, which may exceed [`Self::results`].
    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.total_matches
    }

    /// The publications on the returned page.
    #[must_use]
    pub fn results(&self) -> &[Publication] {
        &self.results
    }

    /// True when more matches exist than were returned.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total_matches > self.results.len()
    }
}
