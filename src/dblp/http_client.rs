//! HTTP client construction for catalog and registry requests.
//!
//! No timeouts are set; requests rely on reqwest's defaults.

use std::panic::{AssertUnwindSafe, catch_unwind};

use reqwest::{Client, ClientBuilder};
use tracing::warn;

use crate::user_agent;

use super::DblpError;

/// Builds the client shared by all requests of one [`super::DblpClient`].
///
/// # Errors
///
/// Returns [`DblpError::ClientBuild`] when reqwest cannot build a client.
pub(crate) fn build_http_client() -> Result<Client, DblpError> {
    match try_build(false) {
        Err(BuildFailure::Panic) => {
            // Restricted sandboxes can panic while reading system proxy
            // settings; retry without the system lookup.
            warn!("HTTP client hit system proxy panic; building without system proxy lookup");
            try_build(true).map_err(BuildFailure::into_error)
        }
        other => other.map_err(BuildFailure::into_error),
    }
}

enum BuildFailure {
    Panic,
    Build(reqwest::Error),
}

impl BuildFailure {
    fn into_error(self) -> DblpError {
        match self {
            Self::Panic => DblpError::client_build("client construction panicked"),
            Self::Build(error) => DblpError::client_build(&error.to_string()),
        }
    }
}

fn try_build(skip_system_proxy: bool) -> Result<Client, BuildFailure> {
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder();
        if skip_system_proxy {
            builder = builder.no_proxy();
        }
        builder.build().map_err(BuildFailure::Build)
    }))
    .map_err(|_| BuildFailure::Panic)?
}

fn base_builder() -> ClientBuilder {
    Client::builder()
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
}
