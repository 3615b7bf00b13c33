//! bibtex-dblp core library.
//!
//! Looks up BibTeX entries in the dblp computer science bibliography by dblp
//! id or DOI, searches dblp for publications, and keeps a small JSON file of
//! user preferences.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`identifier`] - Classification of keys as dblp ids or DOIs, and dblp id
//!   recovery from bibliography entries
//! - [`dblp`] - Request planning, BibTeX retrieval with fallback, and search
//! - [`bibtex`] - Minimal BibTeX reader/writer and local duplicate search
//! - [`convert`] - Re-export of a bibliography in another dblp format
//! - [`citations`] - Citation keys from LaTeX `.aux` files
//! - [`config`] - Layered, JSON-backed preferences

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bibtex;
pub mod citations;
pub mod config;
pub mod convert;
pub mod dblp;
pub mod identifier;

mod user_agent;

// Re-export commonly used types
pub use bibtex::{Bibliography, BibtexEntry};
pub use config::{Config, ConfigError, ConfigKey, Settings, ValueSource};
pub use convert::{ConvertStats, convert_dblp_entries};
pub use dblp::{BibFormat, DblpClient, DblpError, Endpoints, Publication, SearchResults};
pub use identifier::{BibEntry, Identifier, IdentifierKind, classify_key, extract_dblp_id};
