//! Client for BibTeX lookups and publication search.

use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};
use url::Url;

use crate::identifier::classify_key;

use super::http_client::build_http_client;
use super::planner::{RequestCandidate, plan_requests};
use super::{BibFormat, DblpError, Endpoints, SearchResults};

/// Fetches BibTeX entries from dblp (falling back to doi.org for DOIs) and
/// queries the dblp search API.
///
/// Requests are issued one at a time; nothing is cached between calls.
/// Every lookup is async and must be awaited; there is no blocking variant.
pub struct DblpClient {
    client: Client,
    endpoints: Endpoints,
}

impl DblpClient {
    /// Creates a client talking to the public dblp and doi.org services.
    ///
    /// # Errors
    ///
    /// Returns [`DblpError::ClientBuild`] if HTTP client construction fails.
    pub fn new() -> Result<Self, DblpError> {
        Self::with_endpoints(Endpoints::default())
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DblpError::ClientBuild`] if HTTP client construction fails.
    pub fn with_endpoints(endpoints: Endpoints) -> Result<Self, DblpError> {
        Ok(Self {
            client: build_http_client()?,
            endpoints,
        })
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Retrieves the BibTeX entry for `id` in `format`.
    ///
    /// `id` may be a dblp id or a DOI, with or without `DBLP:` / `doi:`
    /// prefix. Candidates are tried in order and the body of the first
    /// successful response is returned. Every failed attempt is logged as a
    /// warning; `None` means the key was unresolvable or every candidate
    /// failed.
    #[tracing::instrument(skip(self), fields(format = %format))]
    pub async fn fetch_bibtex(
        &self,
        id: &str,
        format: BibFormat,
        prefer_doi_org: bool,
    ) -> Option<String> {
        let identifier = classify_key(id);
        debug!(kind = %identifier.kind(), key = %identifier.key(), "key sanitized");
        if !identifier.is_resolvable() {
            return None;
        }

        for candidate in plan_requests(&identifier, format, prefer_doi_org, &self.endpoints) {
            match self.fetch_candidate(&candidate).await {
                Ok(bibtex) => {
                    debug!(url = %candidate.url, bytes = bibtex.len(), "BibTeX retrieved");
                    return Some(bibtex);
                }
                Err(error) => {
                    warn!(id, url = %candidate.url, error = %error, "Could not retrieve entry");
                }
            }
        }
        None
    }

    /// Retrieves the BibTeX of every publication of `author` in `format`.
    ///
    /// `author` uses dblp's person naming, `Last:First` (e.g. `Mehlhorn:Kurt`).
    /// A failed request is logged as a warning; `None` means dblp does not
    /// know the author or the lookup failed.
    #[tracing::instrument(skip(self), fields(format = %format))]
    pub async fn fetch_author_bibtex(&self, author: &str, format: BibFormat) -> Option<String> {
        let author = author.trim();
        if author.is_empty() {
            return None;
        }

        let candidate = RequestCandidate {
            url: self.endpoints.author_bibtex_url(author, format),
            accept: None,
        };
        match self.fetch_candidate(&candidate).await {
            Ok(bibtex) => {
                debug!(url = %candidate.url, bytes = bibtex.len(), "Author bibliography retrieved");
                Some(bibtex)
            }
            Err(error) => {
                warn!(author, url = %candidate.url, error = %error, "Could not retrieve author");
                None
            }
        }
    }

    async fn fetch_candidate(&self, candidate: &RequestCandidate) -> Result<String, DblpError> {
        let mut request = self.client.get(&candidate.url);
        if let Some(accept) = candidate.accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request
            .send()
            .await
            .map_err(|error| DblpError::transport(&candidate.url, &error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DblpError::bad_status(&candidate.url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| DblpError::transport(&candidate.url, &error.to_string()))?;
        String::from_utf8(body.to_vec())
            .map_err(|error| DblpError::malformed(&candidate.url, &error.to_string()))
    }

    /// Searches dblp for publications matching `query`.
    ///
    /// Issues a single request for at most `max_results` hits; there is no
    /// retry and no pagination.
    ///
    /// # Errors
    ///
    /// Returns [`DblpError::Transport`] or [`DblpError::BadStatus`] when the
    /// request fails, [`DblpError::MalformedResponse`] for an unreadable body
    /// and [`DblpError::SearchStatus`] when dblp reports a failure.
    #[tracing::instrument(skip(self))]
    pub async fn search_publications(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<SearchResults, DblpError> {
        let base = self.endpoints.search_url();
        let max_results = max_results.to_string();
        let url = Url::parse_with_params(
            &base,
            [("q", query), ("format", "json"), ("h", max_results.as_str())],
        )
        .map_err(|error| DblpError::malformed(&base, &error.to_string()))?;

        debug!(api_url = %url, "Calling dblp search API");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|error| DblpError::transport(url.as_str(), &error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DblpError::bad_status(url.as_str(), status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|error| DblpError::transport(url.as_str(), &error.to_string()))?;
        let results = SearchResults::from_json(url.as_str(), &body)?;
        info!(
            total = results.total_matches(),
            returned = results.results().len(),
            "dblp search complete"
        );
        Ok(results)
    }
}

impl std::fmt::Debug for DblpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DblpClient")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
