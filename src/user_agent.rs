//! User-Agent string for requests to dblp and doi.org.

/// Project URL advertised to the remote services.
const PROJECT_UA_URL: &str = "https://github.com/volkm/bibtex-dblp";

/// Default User-Agent for all catalog and registry requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("bibtex-dblp/{version} (bibliography-tool; +{PROJECT_UA_URL})")
}
