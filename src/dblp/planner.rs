//! Ordered fallback candidates for a BibTeX lookup.
//!
//! A dblp id has a single source. A DOI can be resolved both by dblp's DOI
//! passthrough and by the doi.org registry; `prefer_doi_org` picks which one
//! is tried first. Candidates are built only when the iterator is advanced,
//! so a lookup that succeeds early never constructs the rest.

use std::iter::FusedIterator;

use crate::identifier::{Identifier, IdentifierKind};

use super::{BibFormat, Endpoints};

/// `Accept` header doi.org needs to answer with BibTeX.
pub const BIBTEX_ACCEPT: &str = "application/x-bibtex; charset=utf-8";

/// One remote lookup attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCandidate {
    /// Target URL.
    pub url: String,
    /// `Accept` header value, when the service needs one.
    pub accept: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    DblpRecord,
    DblpDoi,
    DoiOrg,
}

const DBLP_ONLY: &[Source] = &[Source::DblpRecord];
const DOI_DBLP_FIRST: &[Source] = &[Source::DblpDoi, Source::DoiOrg];
const DOI_DOI_ORG_FIRST: &[Source] = &[Source::DoiOrg, Source::DblpDoi];

/// Lazy sequence of [`RequestCandidate`]s for one identifier.
///
/// Finite and exact-sized; call [`plan_requests`] again to restart.
#[derive(Debug, Clone)]
pub struct CandidatePlan<'a> {
    key: &'a str,
    format: BibFormat,
    endpoints: &'a Endpoints,
    sources: &'static [Source],
    next: usize,
}

/// Plans the lookups for `identifier`, in the order they should be tried.
///
/// [`IdentifierKind::Unknown`] yields an empty plan; callers are expected to
/// reject unresolvable identifiers before planning.
#[must_use]
pub fn plan_requests<'a>(
    identifier: &'a Identifier,
    format: BibFormat,
    prefer_doi_org: bool,
    endpoints: &'a Endpoints,
) -> CandidatePlan<'a> {
    let sources = match identifier.kind() {
        IdentifierKind::Dblp => DBLP_ONLY,
        IdentifierKind::Doi if prefer_doi_org => DOI_DOI_ORG_FIRST,
        IdentifierKind::Doi => DOI_DBLP_FIRST,
        IdentifierKind::Unknown => &[],
    };
    CandidatePlan {
        key: identifier.key(),
        format,
        endpoints,
        sources,
        next: 0,
    }
}

impl CandidatePlan<'_> {
    fn build(&self, source: Source) -> RequestCandidate {
        match source {
            Source::DblpRecord => RequestCandidate {
                url: self.endpoints.record_bibtex_url(self.key, self.format),
                accept: None,
            },
            Source::DblpDoi => RequestCandidate {
                url: self.endpoints.dblp_doi_url(self.key, self.format),
                accept: None,
            },
            Source::DoiOrg => RequestCandidate {
                url: self.endpoints.doi_org_url(self.key),
                accept: Some(BIBTEX_ACCEPT),
            },
        }
    }
}

impl Iterator for CandidatePlan<'_> {
    type Item = RequestCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        let source = *self.sources.get(self.next)?;
        self.next += 1;
        Some(self.build(source))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sources.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CandidatePlan<'_> {}

impl FusedIterator for CandidatePlan<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identifier::classify_key;

    fn endpoints() -> Endpoints {
        Endpoints::new("https://dblp.example", "https://doi.example")
    }

    #[test]
    fn test_plan_dblp_single_candidate_regardless_of_flag() {
        let endpoints = endpoints();
        let id = classify_key("DBLP:conf/spire/BastMW06");
        for prefer_doi_org in [false, true] {
            let plan: Vec<_> =
                plan_requests(&id, BibFormat::Standard, prefer_doi_org, &endpoints).collect();
            assert_eq!(
                plan,
                vec![RequestCandidate {
                    url: "https://dblp.example/rec/bib1/conf/spire/BastMW06.bib".to_string(),
                    accept: None,
                }]
            );
        }
    }

    #[test]
    fn test_plan_doi_dblp_first_by_default() {
        let endpoints = endpoints();
        let id = classify_key("doi:10.1007/11880561_13");
        let plan: Vec<_> = plan_requests(&id, BibFormat::Condensed, false, &endpoints).collect();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].url, "https://dblp.example/doi/bib0/10.1007/11880561_13");
        assert_eq!(plan[0].accept, None);
        assert_eq!(plan[1].url, "https://doi.example/10.1007/11880561_13");
        assert_eq!(plan[1].accept, Some(BIBTEX_ACCEPT));
    }

    #[test]
    fn test_plan_doi_registry_first_when_preferred() {
        let endpoints = endpoints();
        let id = classify_key("10.1007/11880561_13");
        let plan: Vec<_> = plan_requests(&id, BibFormat::Crossref, true, &endpoints).collect();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].url, "https://doi.example/10.1007/11880561_13");
        assert_eq!(plan[0].accept, Some("application/x-bibtex; charset=utf-8"));
        assert_eq!(plan[1].url, "https://dblp.example/doi/bib2/10.1007/11880561_13");
        assert_eq!(plan[1].accept, None);
    }

    #[test]
    fn test_plan_unknown_is_empty() {
        let endpoints = endpoints();
        let id = classify_key("12345");
        assert_eq!(plan_requests(&id, BibFormat::Standard, false, &endpoints).count(), 0);
    }

    #[test]
    fn test_plan_is_lazy_and_exact_sized() {
        let endpoints = endpoints();
        let id = classify_key("10.1007/11880561_13");
        let mut plan = plan_requests(&id, BibFormat::Standard, false, &endpoints);
        assert_eq!(plan.len(), 2);
        let first = plan.next().unwrap();
        assert!(first.url.contains("/doi/bib1/"));
        // Only the first candidate has been built.
        assert_eq!(plan.len(), 1);
        assert!(plan.next().is_some());
        assert_eq!(plan.len(), 0);
        assert!(plan.next().is_none());
        assert!(plan.next().is_none());
    }

    #[test]
    fn test_plan_restarts_from_scratch() {
        let endpoints = endpoints();
        let id = classify_key("10.1/x");
        let first_pass: Vec<_> =
            plan_requests(&id, BibFormat::Standard, true, &endpoints).collect();
        let second_pass: Vec<_> =
            plan_requests(&id, BibFormat::Standard, true, &endpoints).collect();
        assert_eq!(first_pass, second_pass);
    }
}
