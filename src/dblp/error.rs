//! Error types for dblp requests.
//!
//! Messages follow the What/Why/Suggestion layout used across the project.

use thiserror::Error;

/// Errors surfaced by [`super::DblpClient`].
///
/// BibTeX lookups swallow these (logging each failed candidate); the search
/// API has no fallback and returns them to the caller.
#[derive(Debug, Clone, Error)]
pub enum DblpError {
    /// The HTTP client could not be constructed
    #[error("cannot initialize HTTP client: {reason}\n  Suggestion: Check TLS and proxy settings")]
    ClientBuild {
        /// Why construction failed
        reason: String,
    },

    /// The request never produced a response
    #[error("request to '{url}' failed: {reason}\n  Suggestion: Check your network connection")]
    Transport {
        /// The URL that was requested
        url: String,
        /// Underlying transport error
        reason: String,
    },

    /// The server answered with a non-success HTTP status
    #[error("request to '{url}' returned HTTP {status}\n  Suggestion: {suggestion}")]
    BadStatus {
        /// The URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
        /// How to fix the issue
        suggestion: String,
    },

    /// The response body could not be decoded
    #[error("unexpected response from '{url}': {reason}\n  Suggestion: The service may have changed its response format")]
    MalformedResponse {
        /// The URL that was requested
        url: String,
        /// What was wrong with the body
        reason: String,
    },

    /// The search API reported a failure inside an HTTP 200 response
    #[error("dblp search reported status {code}: {text}\n  Suggestion: Simplify the query and try again")]
    SearchStatus {
        /// Status code embedded in the response
        code: u16,
        /// Status text embedded in the response
        text: String,
    },
}

impl DblpError {
    /// Creates a `ClientBuild` error.
    #[must_use]
    pub fn client_build(reason: &str) -> Self {
        Self::ClientBuild {
            reason: reason.to_string(),
        }
    }

    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(url: &str, reason: &str) -> Self {
        Self::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `BadStatus` error with a status-specific suggestion.
    #[must_use]
    pub fn bad_status(url: &str, status: u16) -> Self {
        let suggestion = match status {
            404 => "Check that the key exists in dblp".to_string(),
            429 => "dblp rate limit exceeded. Wait a minute and try again".to_string(),
            s if s >= 500 => "The service is unavailable. Try again later".to_string(),
            _ => "Check the request and try again".to_string(),
        };
        Self::BadStatus {
            url: url.to_string(),
            status,
            suggestion,
        }
    }

    /// Creates a `MalformedResponse` error.
    #[must_use]
    pub fn malformed(url: &str, reason: &str) -> Self {
        Self::MalformedResponse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `SearchStatus` error.
    #[must_use]
    pub fn search_status(code: u16, text: &str) -> Self {
        Self::SearchStatus {
            code,
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_not_found_suggestion() {
        let err = DblpError::bad_status("https://dblp.org/rec/bib0/x.bib", 404);
        let msg = err.to_string();
        assert!(msg.contains("HTTP 404"), "should contain status");
        assert!(msg.contains("https://dblp.org/rec/bib0/x.bib"), "should contain URL");
        assert!(msg.contains("exists in dblp"), "should suggest checking key");
    }

    #[test]
    fn test_bad_status_server_error_suggestion() {
        let msg = DblpError::bad_status("https://doi.org/10.1/x", 503).to_string();
        assert!(msg.contains("Try again later"));
    }

    #[test]
    fn test_search_status_message() {
        let msg = DblpError::search_status(500, "Internal Error").to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Error"));
        assert!(msg.contains("Suggestion"));
    }

    #[test]
    fn test_transport_message() {
        let msg = DblpError::transport("https://dblp.org/search/publ/api", "connection refused")
            .to_string();
        assert!(msg.contains("connection refused"));
        assert!(msg.contains("network"));
    }
}
