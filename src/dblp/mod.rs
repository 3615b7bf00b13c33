//! Access to the dblp computer science bibliography.
//!
//! # Architecture
//!
//! - [`BibFormat`] - The three BibTeX export variants dblp offers
//! - [`Endpoints`] - Base URLs of dblp and the doi.org resolver
//! - [`plan_requests`] - Lazy, ordered fallback candidates for one key
//! - [`DblpClient`] - Fetches BibTeX through the candidates and queries the search API
//! - [`SearchResults`] / [`Publication`] - Parsed search API responses
//!
//! # Example
//!
//! ```no_run
//! use bibtex_dblp::dblp::{BibFormat, DblpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DblpClient::new()?;
//! if let Some(bibtex) = client
//!     .fetch_bibtex("DBLP:conf/spire/BastMW06", BibFormat::Standard, false)
//!     .await
//! {
//!     println!("{bibtex}");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod http_client;
mod planner;
mod search;

pub use client::DblpClient;
pub use error::DblpError;
pub use planner::{BIBTEX_ACCEPT, CandidatePlan, RequestCandidate, plan_requests};
pub use search::{Author, Publication, SearchResults};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default dblp base URL.
pub const DEFAULT_DBLP_BASE_URL: &str = "https://dblp.org";

/// Default DOI registry resolver base URL.
pub const DEFAULT_DOI_ORG_BASE_URL: &str = "https://doi.org";

/// BibTeX export variant offered by dblp.
///
/// - `condensed`: short booktitle, no editors, no URLs
/// - `standard`: full entry including editors, DOI and `biburl`
/// - `crossref`: entry referencing a separate `@proceedings` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BibFormat {
    #[default]
    Condensed,
    Standard,
    Crossref,
}

impl BibFormat {
    /// All formats, in dblp's numbering order.
    pub const ALL: [Self; 3] = [Self::Condensed, Self::Standard, Self::Crossref];

    /// The configuration/CLI name of the format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Condensed => "condensed",
            Self::Standard => "standard",
            Self::Crossref => "crossref",
        }
    }

    /// The selector token used in dblp publication URLs, e.g. `bib1` in
    /// `https://dblp.org/rec/bib1/journals/ir/BastMW08.bib`.
    #[must_use]
    pub fn url_part(self) -> &'static str {
        match self {
            Self::Condensed => "bib0",
            Self::Standard => "bib1",
            Self::Crossref => "bib2",
        }
    }

    /// The selector token used in dblp author bibliography URLs, e.g. `tb1` in
    /// `https://dblp.org/pers/tb1/b/Bast:Hannah.bib`.
    #[must_use]
    pub fn author_url_part(self) -> &'static str {
        match self {
            Self::Condensed => "tb0",
            Self::Standard => "tb1",
            Self::Crossref => "tb2",
        }
    }
}

impl fmt::Display for BibFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BibFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown format '{s}' (expected one of: {})",
                    Self::ALL.map(Self::as_str).join(", ")
                )
            })
    }
}

/// Base URLs of the remote services.
///
/// Overridable so tests can point the client at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// dblp base URL, without trailing slash.
    pub dblp: String,
    /// doi.org base URL, without trailing slash.
    pub doi_org: String,
}

impl Endpoints {
    /// Creates endpoints from explicit base URLs; trailing slashes are removed.
    #[must_use]
    pub fn new(dblp: impl Into<String>, doi_org: impl Into<String>) -> Self {
        Self {
            dblp: trim_base(dblp.into()),
            doi_org: trim_base(doi_org.into()),
        }
    }

    /// BibTeX export of a dblp record.
    #[must_use]
    pub fn record_bibtex_url(&self, key: &str, format: BibFormat) -> String {
        format!("{}/rec/{}/{key}.bib", self.dblp, format.url_part())
    }

    /// dblp lookup of a DOI, exported as BibTeX.
    #[must_use]
    pub fn dblp_doi_url(&self, doi: &str, format: BibFormat) -> String {
        format!("{}/doi/{}/{doi}", self.dblp, format.url_part())
    }

    /// doi.org resolution of a DOI (content negotiated through `Accept`).
    #[must_use]
    pub fn doi_org_url(&self, doi: &str) -> String {
        format!("{}/{doi}", self.doi_org)
    }

    /// BibTeX export of all publications of `author`, given as `Last:First`.
    ///
    /// dblp files person pages under the lower-cased first letter of the name.
    #[must_use]
    pub fn author_bibtex_url(&self, author: &str, format: BibFormat) -> String {
        let initial: String = author
            .chars()
            .next()
            .map(|first| first.to_lowercase().collect())
            .unwrap_or_default();
        format!(
            "{}/pers/{}/{initial}/{author}.bib",
            self.dblp,
            format.author_url_part()
        )
    }

    /// The publication search API.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}/search/publ/api", self.dblp)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_DBLP_BASE_URL, DEFAULT_DOI_ORG_BASE_URL)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
